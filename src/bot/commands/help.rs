use crate::bot::{Context, Error};
use poise::ChoiceParameter;

#[derive(Clone, Copy, Debug, ChoiceParameter)]
pub enum HelpMode {
    #[name = "summary"]
    Summary,
    #[name = "detailed"]
    Detailed,
}

/// Shows what the bot can do
#[poise::command(prefix_command, slash_command)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "How much detail to show"] mode: Option<HelpMode>,
) -> Result<(), Error> {
    let prefix = ctx.data().config.bot.prefix.clone();
    let text = match mode.unwrap_or(HelpMode::Summary) {
        HelpMode::Summary => summary(&prefix),
        HelpMode::Detailed => detailed(&prefix),
    };
    ctx.say(text).await?;
    Ok(())
}

fn summary(p: &str) -> String {
    format!(
        "**Moderation:** {p}ban, {p}kick, {p}mute, {p}unmute, {p}deafen, {p}undeafen, \
{p}disconnect, {p}blackout, {p}summon, {p}nickname, {p}pin, {p}unpin, {p}1984\n\
**Litwa:** {p}bontibi, {p}gaeree, {p}momtibi, {p}bruhvy, {p}ree\n\
Use `{p}help detailed` for usage."
    )
}

fn detailed(p: &str) -> String {
    format!(
        r#"
# Moderation
Mention the users a command applies to. Members that can't be acted on are skipped and listed.
- `{p}ban @user...` / `{p}kick @user...`
- `{p}mute` / `{p}deafen [@user...]`: yourself when nobody is mentioned.
- `{p}unmute` / `{p}undeafen @user...`
- `{p}disconnect [@user...]` (`{p}dc`): anyone may disconnect themselves.
- `{p}blackout @user...` (`{p}bo`): ends screen shares by bouncing users through a temporary channel.
- `{p}summon @user...` (`{p}drag`): pulls users into your voice channel.
- `{p}nickname [@user...] <nickname>` (`{p}nick`): anyone may rename themselves.
- Reply to a message with `{p}pin`, `{p}unpin` or `{p}1984` (delete). You can always delete your own messages.

# Litwa
- `{p}bontibi`, `{p}gaeree`, `{p}momtibi [@user...]`
- `{p}bruhvy`, `{p}ree`
"#
    )
}
