#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommand {
    pub command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let mut parts = text.split_whitespace();
        let command = parts.next()?.to_lowercase();
        let args = parts.map(|e| return e.to_string()).collect();

        return Some(SlashCommand { command, args });
    }

    fn is(&self, names: &[&str]) -> bool {
        return names.contains(&self.command.as_str());
    }

    pub fn is_new(&self) -> bool {
        return self.is(&["/new", "/n"]);
    }

    pub fn is_switch(&self) -> bool {
        return self.is(&["/switch", "/s"]);
    }

    pub fn is_delete(&self) -> bool {
        return self.is(&["/delete", "/d"]);
    }

    pub fn is_upload(&self) -> bool {
        return self.is(&["/upload", "/u"]);
    }

    pub fn is_clear(&self) -> bool {
        return self.is(&["/clear"]);
    }

    pub fn is_help(&self) -> bool {
        return self.is(&["/help", "/h"]);
    }

    pub fn is_quit(&self) -> bool {
        return self.is(&["/quit", "/exit", "/q"]);
    }

    /// First argument as a 1-based index into the session list.
    pub fn index_arg(&self) -> Option<usize> {
        let raw = self.args.first()?;
        return match raw.parse::<usize>() {
            Ok(idx) if idx > 0 => Some(idx - 1),
            _ => None,
        };
    }

    /// Everything after the first argument, joined back together.
    pub fn trailing_text(&self) -> String {
        if self.args.len() < 2 {
            return "".to_string();
        }

        return self.args[1..].join(" ");
    }
}
