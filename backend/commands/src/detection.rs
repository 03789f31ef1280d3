/// Command detection: prefix/mention check and tokenizing.
use crate::types::ParsedInvocation;

/// Strip the text prefix or a mention of the bot from the start of `content`.
///
/// Returns `None` when the message is not addressed to the bot. An empty
/// text prefix never matches; only mentions do.
pub fn strip_prefix<'a>(content: &'a str, prefix: &str, bot_id: Option<u64>) -> Option<&'a str> {
    if !prefix.is_empty() {
        if let Some(rest) = content.strip_prefix(prefix) {
            return Some(rest);
        }
    }

    let id = bot_id?;
    [format!("<@{id}>"), format!("<@!{id}>")]
        .iter()
        .find_map(|mention| content.strip_prefix(mention.as_str()))
}

/// Split the text after the prefix into command name and argument tokens.
/// Returns `None` if there is no command token at all.
pub fn parse_invocation(body: &str) -> Option<ParsedInvocation> {
    let mut tokens = body.split_whitespace();
    let command = tokens.next()?.to_lowercase();
    Some(ParsedInvocation {
        command,
        subcommand: None,
        args: tokens.map(str::to_string).collect(),
    })
}
