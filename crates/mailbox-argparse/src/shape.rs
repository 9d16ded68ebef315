/// What kind of value an argument carries and how it is checked.
///
/// Every shape except [`Shape::Flag`] and [`Shape::Help`] expects a value
/// token after its switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Boolean switch that may stand alone (`--nodl`) or take `true`/`false`.
    Flag,
    /// A flag that requests help output.
    Help,
    /// Explicit `true`/`false` value.
    Boolean,
    Integer,
    Real,
    Text,
    /// Text naming a directory that must exist.
    Directory,
    /// Text naming a file that must exist.
    File,
    /// Text restricted to a fixed, ordered set of literals.
    Options(Vec<String>),
    /// Existing JSON file whose members are spliced into the token stream.
    ArgsFile,
}

impl Shape {
    /// Build an [`Shape::Options`] from any list of literals.
    pub fn options<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Options(values.into_iter().map(Into::into).collect())
    }

    /// Whether the switch may appear without a value.
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag | Self::Help)
    }

    /// Whether the value is kept as text (and goes through option and
    /// file-system checks).
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Directory | Self::File | Self::Options(_) | Self::ArgsFile
        )
    }

    /// Value placeholder shown after the switch in help output.
    pub(crate) fn placeholder(&self) -> &'static str {
        match self {
            Self::Flag | Self::Help => "",
            Self::Options(_) => " OPTION",
            Self::Directory => " DIR",
            Self::File | Self::ArgsFile => " FILE",
            Self::Text => " TEXT",
            Self::Integer => " ###",
            Self::Real => " #.#",
            Self::Boolean => " true|false",
        }
    }
}

/// Whether a value must be resolvable once parsing is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Presence {
    #[default]
    Optional,
    Required,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_flag_shapes_stand_alone() {
        assert!(Shape::Flag.is_flag());
        assert!(Shape::Help.is_flag());
        assert!(!Shape::Boolean.is_flag());
        assert!(!Shape::ArgsFile.is_flag());
    }

    #[test]
    fn text_shapes_include_checked_strings() {
        for shape in [
            Shape::Text,
            Shape::Directory,
            Shape::File,
            Shape::ArgsFile,
            Shape::options(["a"]),
        ] {
            assert!(shape.is_text(), "{shape:?} should be text");
        }
        for shape in [Shape::Integer, Shape::Real, Shape::Boolean, Shape::Flag] {
            assert!(!shape.is_text(), "{shape:?} should not be text");
        }
    }

    #[test]
    fn placeholders_follow_shape() {
        assert_eq!(Shape::Help.placeholder(), "");
        assert_eq!(Shape::ArgsFile.placeholder(), " FILE");
        assert_eq!(Shape::options(["x"]).placeholder(), " OPTION");
        assert_eq!(Shape::Integer.placeholder(), " ###");
        assert_eq!(Shape::Real.placeholder(), " #.#");
    }
}
