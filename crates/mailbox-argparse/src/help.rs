use crate::error::{ValidationError, ValidationErrorKind};
use crate::registry::{Descriptor, Registry};
use crate::shape::Shape;

const SWITCH_INDENT: &str = " ";
const SWITCH_GAP: usize = 4;
const MIN_HELP_WIDTH: usize = 20;

/// Hard-wrap `text` into chunks of at most `width` characters.
///
/// Empty text yields a single empty line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return vec![text.to_string()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

fn help_lines(registry: &Registry, def: &Descriptor) -> String {
    let mut out = String::new();
    if !def.is_required() {
        out.push_str("(Optional) ");
    }
    out.push_str(def.help());

    if !def.depends_on().is_empty() {
        let switches: Vec<&str> = def
            .depends_on()
            .iter()
            .filter_map(|key| registry.get(key))
            .map(Descriptor::primary_switch)
            .collect();
        out.push_str(&format!("\nDepends on {}", switches.join(" ")));
    }
    if def.switches().len() > 1 {
        out.push_str(&format!("\n(Other forms: {})", def.switches()[1..].join(" ")));
    }
    if let Some(default_value) = def.default_value() {
        out.push_str(&format!("\nDefault value: {default_value}"));
    }
    if let Shape::Options(options) = def.shape() {
        out.push_str(&format!("\nOptions: {}", options.join(" ")));
    }
    out.push_str(&format!("\nConfiguration key: {}", def.key()));
    out
}

impl Registry {
    /// Render help for every described argument, wrapped to `max_width`
    /// columns.
    pub fn help(&self, max_width: usize) -> String {
        let rows: Vec<(String, String)> = self
            .iter()
            .map(|d| {
                (
                    format!("{}{}", d.primary_switch(), d.shape().placeholder()),
                    help_lines(self, d),
                )
            })
            .collect();

        let switch_width = rows
            .iter()
            .map(|(left, _)| left.chars().count())
            .max()
            .unwrap_or(0)
            + SWITCH_GAP;
        let help_width = max_width
            .saturating_sub(switch_width + SWITCH_INDENT.len() + 1)
            .max(MIN_HELP_WIDTH);
        let blank = " ".repeat(switch_width);

        let mut out = String::new();
        for (left, help) in rows {
            let mut first = true;
            for line in help.split('\n') {
                for chunk in wrap(line, help_width) {
                    let column = if first { left.as_str() } else { blank.as_str() };
                    first = false;
                    let line = format!("{SWITCH_INDENT}{column:switch_width$}{chunk}");
                    out.push_str(line.trim_end());
                    out.push('\n');
                }
            }
            out.push('\n');
        }
        out
    }

    /// Describe one validation error in a sentence.
    pub fn format_error(&self, error: &ValidationError) -> String {
        let value = error.value().unwrap_or_default();
        if error.kind() == ValidationErrorKind::UnrecognisedSwitch {
            return format!("Unrecognised switch '{value}'");
        }

        let key = error.key().unwrap_or_default();
        let (label, switch) = match self.get(key) {
            Some(def) => (def.label(), def.primary_switch()),
            None => (key, key),
        };
        match error.kind() {
            ValidationErrorKind::IncorrectType => {
                format!("Incorrect value type '{value}' provided for '{label}' ({switch})")
            }
            ValidationErrorKind::FileSystemObjectNotFound => {
                format!("File or directory '{value}' for argument '{label}' ({switch}) not found")
            }
            ValidationErrorKind::RequiredArgMissing => {
                format!("Required argument '{label}' ({switch}) missing")
            }
            ValidationErrorKind::NoValue => {
                format!("Argument '{label}' ({switch}) has no value")
            }
            ValidationErrorKind::UnknownOption => {
                format!("Unexpected option '{value}' provided for argument '{label}' ({switch})")
            }
            ValidationErrorKind::UnrecognisedSwitch => unreachable!("handled above"),
        }
    }

    /// Render every error, one per line, followed by a pointer to the help
    /// switch when one is described.
    pub fn render_errors(&self, errors: &[ValidationError]) -> String {
        let mut out = String::new();
        for error in errors {
            out.push_str(&self.format_error(error));
            out.push('\n');
        }
        if let Some(help) = self.help_descriptor() {
            out.push_str(&format!(
                "\nUse '{}' to display more help.\n",
                help.primary_switch()
            ));
        }
        out
    }
}
