use indexmap::IndexMap;

use crate::error::DescribeError;
use crate::shape::{Presence, Shape};

/// Builder for one argument description.
///
/// # Example
///
/// ```
/// use mailbox_argparse::{Arg, Shape};
///
/// let arg = Arg::new("USER", Shape::Text)
///     .switches(["-u", "--username"])
///     .label("Username")
///     .help("Account username")
///     .required();
/// ```
#[derive(Debug, Clone)]
pub struct Arg {
    key: String,
    switches: Vec<String>,
    label: String,
    help: String,
    shape: Shape,
    presence: Presence,
    depends_on: Vec<String>,
    default_value: Option<String>,
}

impl Arg {
    pub fn new(key: impl Into<String>, shape: Shape) -> Self {
        Self {
            key: key.into(),
            switches: Vec::new(),
            label: String::new(),
            help: String::new(),
            shape,
            presence: Presence::Optional,
            depends_on: Vec::new(),
            default_value: None,
        }
    }

    /// Add a switch. The first one added is the primary switch.
    pub fn switch(mut self, switch: impl Into<String>) -> Self {
        self.switches.push(switch.into());
        self
    }

    pub fn switches<I, S>(mut self, switches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.switches.extend(switches.into_iter().map(Into::into));
        self
    }

    /// Short name used in error messages.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Help text. Embedded newlines start new help lines.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }


    /// Require `key` to be resolvable as well. `key` must already be described.
    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.depends_on.push(key.into());
        self
    }

    /// Literal applied when the argument is not given. It goes through the
    /// same conversion as a command-line value.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A registered argument.
#[derive(Debug, Clone)]
pub struct Descriptor {
    key: String,
    switches: Vec<String>,
    label: String,
    help: String,
    shape: Shape,
    presence: Presence,
    depends_on: Vec<String>,
    default_value: Option<String>,
}

impl Descriptor {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn switches(&self) -> &[String] {
        &self.switches
    }

    /// The first switch; used when referring to the argument in output and
    /// when splicing args-file members.
    pub fn primary_switch(&self) -> &str {
        // `describe` rejects descriptors without switches.
        &self.switches[0]
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub(crate) fn matches(&self, token: &str) -> bool {
        self.switches.iter().any(|s| s == token)
    }
}

/// Ordered set of argument descriptions.
///
/// Registration order is kept: defaults are applied and help is rendered in
/// that order. Once built, a registry is only read, so it can serve any
/// number of parse calls.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: IndexMap<String, Descriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an argument.
    ///
    /// Dependencies must be described before the arguments that depend on
    /// them. Switches must be unique across the registry.
    pub fn describe(&mut self, arg: Arg) -> Result<(), DescribeError> {
        let Arg {
            key,
            switches,
            label,
            help,
            shape,
            presence,
            depends_on,
            default_value,
        } = arg;

        if key.is_empty() {
            return Err(DescribeError::EmptyKey);
        }
        if self.descriptors.contains_key(&key) {
            return Err(DescribeError::DuplicateKey(key));
        }
        if switches.is_empty() {
            return Err(DescribeError::NoSwitches { key });
        }
        if switches.iter().any(|s| s.is_empty()) {
            return Err(DescribeError::EmptySwitch { key });
        }
        for switch in &switches {
            if let Some(existing) = self.find(switch) {
                return Err(DescribeError::DuplicateSwitch {
                    switch: switch.clone(),
                    existing: existing.key.clone(),
                    key,
                });
            }
        }
        if label.is_empty() {
            return Err(DescribeError::EmptyLabel { key });
        }
        if help.is_empty() {
            return Err(DescribeError::EmptyHelp { key });
        }
        if let Some(missing) = depends_on
            .iter()
            .find(|dep| !self.descriptors.contains_key(dep.as_str()))
        {
            return Err(DescribeError::UnknownDependency {
                dependency: missing.clone(),
                key,
            });
        }

        let default_value = default_value.filter(|v| !v.is_empty());
        if let Shape::Options(options) = &shape {
            if options.is_empty() {
                return Err(DescribeError::NoOptions { key });
            }
            if let Some(default) = &default_value {
                if !options.contains(default) {
                    return Err(DescribeError::DefaultNotAnOption {
                        default: default.clone(),
                        key,
                    });
                }
            }
        }

        tracing::trace!(key = %key, "described argument");
        self.descriptors.insert(
            key.clone(),
            Descriptor {
                key,
                switches,
                label,
                help,
                shape,
                presence,
                depends_on,
                default_value,
            },
        );
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Descriptor> {
        self.descriptors.get(key)
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// The first descriptor claiming `switch`.
    pub fn find(&self, switch: &str) -> Option<&Descriptor> {
        self.descriptors.values().find(|d| d.matches(switch))
    }

    /// The first registered [`Shape::Help`] descriptor.
    pub fn help_descriptor(&self) -> Option<&Descriptor> {
        self.descriptors
            .values()
            .find(|d| matches!(d.shape, Shape::Help))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn help_arg(key: &str) -> Arg {
        Arg::new(key, Shape::Help)
            .switches(["-h", "-?"])
            .label("help")
            .help("help detail")
    }

    fn other_arg() -> Arg {
        Arg::new("DEPENDS", Shape::Text)
            .switch("-o")
            .label("other")
            .help("other detail")
    }

    #[test]
    fn key_is_required() {
        let mut registry = Registry::new();
        let err = registry.describe(help_arg("")).unwrap_err();
        assert!(matches!(err, DescribeError::EmptyKey));
    }

    #[test]
    fn switches_are_required() {
        let mut registry = Registry::new();
        let arg = Arg::new("HELP", Shape::Help).label("help").help("help detail");
        let err = registry.describe(arg).unwrap_err();
        assert!(matches!(err, DescribeError::NoSwitches { .. }));

        let arg = Arg::new("HELP", Shape::Help)
            .switch("")
            .label("help")
            .help("help detail");
        let err = registry.describe(arg).unwrap_err();
        assert!(matches!(err, DescribeError::EmptySwitch { .. }));
    }

    #[test]
    fn label_and_help_are_required() {
        let mut registry = Registry::new();
        let arg = Arg::new("HELP", Shape::Help).switch("-h").help("help detail");
        assert!(matches!(
            registry.describe(arg).unwrap_err(),
            DescribeError::EmptyLabel { .. }
        ));

        let arg = Arg::new("HELP", Shape::Help).switch("-h").label("help");
        assert!(matches!(
            registry.describe(arg).unwrap_err(),
            DescribeError::EmptyHelp { .. }
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn dependencies_must_already_be_described() {
        let mut registry = Registry::new();
        let err = registry
            .describe(help_arg("HELP").depends_on("DEPENDS"))
            .unwrap_err();
        match err {
            DescribeError::UnknownDependency { key, dependency } => {
                assert_eq!(key, "HELP");
                assert_eq!(dependency, "DEPENDS");
            }
            other => panic!("expected UnknownDependency, got: {other:?}"),
        }

        // Describing the target afterwards does not rescue the earlier call.
        registry.describe(other_arg().required()).unwrap();
        assert!(registry.get("HELP").is_none());
    }

    #[test]
    fn dependency_on_described_argument_is_accepted() {
        let mut registry = Registry::new();
        registry.describe(other_arg().required()).unwrap();
        registry
            .describe(help_arg("HELP").depends_on("DEPENDS"))
            .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("HELP").unwrap().depends_on(), ["DEPENDS"]);
    }

    #[test]
    fn duplicate_keys_and_switches_are_rejected() {
        let mut registry = Registry::new();
        registry.describe(help_arg("HELP")).unwrap();

        let err = registry.describe(help_arg("HELP")).unwrap_err();
        assert!(matches!(err, DescribeError::DuplicateKey(k) if k == "HELP"));

        let err = registry
            .describe(
                Arg::new("HOST", Shape::Text)
                    .switches(["--host", "-h"])
                    .label("host")
                    .help("host name"),
            )
            .unwrap_err();
        match err {
            DescribeError::DuplicateSwitch {
                key,
                switch,
                existing,
            } => {
                assert_eq!(key, "HOST");
                assert_eq!(switch, "-h");
                assert_eq!(existing, "HELP");
            }
            other => panic!("expected DuplicateSwitch, got: {other:?}"),
        }
    }

    #[test]
    fn options_need_values_and_a_legal_default() {
        let mut registry = Registry::new();
        let base = |shape| {
            Arg::new("OPT", shape)
                .switch("-o")
                .label("option")
                .help("option detail")
        };

        let err = registry.describe(base(Shape::options(Vec::<String>::new())));
        assert!(matches!(err, Err(DescribeError::NoOptions { .. })));

        let err = registry.describe(base(Shape::options(["A", "B"])).default_value("C"));
        assert!(matches!(
            err,
            Err(DescribeError::DefaultNotAnOption { default, .. }) if default == "C"
        ));

        registry
            .describe(base(Shape::options(["A", "B"])).default_value("B"))
            .unwrap();
        assert_eq!(registry.get("OPT").unwrap().default_value(), Some("B"));
    }

    #[test]
    fn empty_default_counts_as_none() {
        let mut registry = Registry::new();
        registry
            .describe(
                Arg::new("OPT", Shape::options(["A"]))
                    .switch("-o")
                    .label("option")
                    .help("option detail")
                    .default_value(""),
            )
            .unwrap();
        assert_eq!(registry.get("OPT").unwrap().default_value(), None);
    }

    #[test]
    fn lookups_follow_registration_order() {
        let mut registry = Registry::new();
        registry.describe(other_arg()).unwrap();
        registry.describe(help_arg("HELP")).unwrap();

        let keys: Vec<_> = registry.iter().map(Descriptor::key).collect();
        assert_eq!(keys, ["DEPENDS", "HELP"]);
        assert_eq!(registry.find("-?").map(Descriptor::key), Some("HELP"));
        assert_eq!(registry.help_descriptor().map(Descriptor::primary_switch), Some("-h"));
        assert!(!registry.get("DEPENDS").unwrap().is_required());
    }
}
