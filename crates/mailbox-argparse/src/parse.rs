use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use indexmap::IndexSet;

use crate::error::{ArgsFileError, ValidationError, ValidationErrorKind};
use crate::fs::{FileSystem, OsFileSystem};
use crate::registry::{Descriptor, Registry};
use crate::shape::Shape;
use crate::values::{Value, Values};

/// Outcome of one parse call.
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    /// Every problem found, duplicates removed, in the order first seen.
    pub errors: Vec<ValidationError>,
    pub values: Values,
}

impl Parsed {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Registry {
    /// Parse `tokens` against the described arguments using the real file
    /// system.
    pub fn parse<I, S>(&self, tokens: I) -> Result<Parsed, ArgsFileError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse_with(tokens, &OsFileSystem)
    }

    /// Parse `tokens`, checking paths and reading args files through `fs`.
    ///
    /// Problems with the input are collected in [`Parsed::errors`]; only a
    /// failure to load an args file aborts the call.
    pub fn parse_with<I, S>(&self, tokens: I, fs: &dyn FileSystem) -> Result<Parsed, ArgsFileError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scan = Scan {
            registry: self,
            fs,
            queue: tokens.into_iter().map(Into::into).collect(),
            values: Values::default(),
            errors: Vec::new(),
            loaded_files: HashSet::new(),
        };
        scan.run()?;
        scan.resolve();

        let Scan { values, errors, .. } = scan;
        let errors: IndexSet<ValidationError> = errors.into_iter().collect();
        Ok(Parsed {
            errors: errors.into_iter().collect(),
            values,
        })
    }
}

struct Scan<'a> {
    registry: &'a Registry,
    fs: &'a dyn FileSystem,
    queue: VecDeque<String>,
    values: Values,
    errors: Vec<ValidationError>,
    loaded_files: HashSet<String>,
}

impl<'a> Scan<'a> {
    fn run(&mut self) -> Result<(), ArgsFileError> {
        let registry = self.registry;
        while let Some(token) = self.queue.pop_front() {
            let Some(descriptor) = registry.find(&token) else {
                self.errors.push(ValidationError::unrecognised(token));
                continue;
            };
            let key = descriptor.key();
            let value = self.queue.pop_front();

            if descriptor.shape().is_flag() {
                let flag = match value {
                    Some(literal) => match parse_bool(&literal) {
                        Some(b) => b,
                        None => {
                            // Not ours; it is the next switch (or a stray literal).
                            self.queue.push_front(literal);
                            true
                        }
                    },
                    None => true,
                };
                self.values.insert(key, Value::Bool(flag));
                continue;
            }

            let Some(value) = value else {
                self.errors.push(ValidationError::new(
                    ValidationErrorKind::NoValue,
                    Some(token),
                    key,
                ));
                continue;
            };

            if !descriptor.shape().is_text() {
                match coerce(descriptor.shape(), &value) {
                    Some(v) => self.values.insert(key, v),
                    None => self.errors.push(ValidationError::new(
                        ValidationErrorKind::IncorrectType,
                        Some(value),
                        key,
                    )),
                }
                continue;
            }

            if let Some(kind) = self.check_text(descriptor, &value) {
                self.errors.push(ValidationError::new(kind, Some(value), key));
                continue;
            }

            self.values.insert(key, Value::Text(value.clone()));

            if matches!(descriptor.shape(), Shape::ArgsFile) {
                self.expand_args_file(&value)?;
            }
        }
        Ok(())
    }

    fn check_text(&self, descriptor: &Descriptor, value: &str) -> Option<ValidationErrorKind> {
        match descriptor.shape() {
            Shape::Options(options) if !options.iter().any(|o| o == value) => {
                Some(ValidationErrorKind::UnknownOption)
            }
            Shape::Directory if !self.fs.is_dir(value) => {
                Some(ValidationErrorKind::FileSystemObjectNotFound)
            }
            Shape::File | Shape::ArgsFile if !self.fs.is_file(value) => {
                Some(ValidationErrorKind::FileSystemObjectNotFound)
            }
            _ => None,
        }
    }

    /// Splice the members of the args file at `path` into the front of the
    /// queue, so they are processed before anything that followed the switch.
    fn expand_args_file(&mut self, path: &str) -> Result<(), ArgsFileError> {
        if !self.loaded_files.insert(path.to_string()) {
            tracing::warn!(path, "args file already loaded, not expanding it again");
            return Ok(());
        }

        let document: serde_json::Value = {
            let reader = self.fs.open(path).map_err(|source| ArgsFileError::Read {
                path: PathBuf::from(path),
                source,
            })?;
            serde_json::from_reader(reader).map_err(|source| ArgsFileError::Json {
                path: PathBuf::from(path),
                source,
            })?
        };
        let serde_json::Value::Object(members) = document else {
            return Err(ArgsFileError::NotAnObject {
                path: PathBuf::from(path),
            });
        };

        let mut spliced = Vec::with_capacity(members.len() * 2);
        for (name, member) in members {
            let Some(descriptor) = self.registry.get(&name) else {
                tracing::debug!(path, member = %name, "ignoring unknown args file member");
                continue;
            };
            let Some(text) = member_text(member) else {
                continue;
            };
            spliced.push(descriptor.primary_switch().to_string());
            spliced.push(text);
        }

        tracing::debug!(path, tokens = spliced.len(), "expanded args file");
        for token in spliced.into_iter().rev() {
            self.queue.push_front(token);
        }
        Ok(())
    }

    /// Report missing dependencies and required arguments, then fill in
    /// defaults.
    fn resolve(&mut self) {
        let registry = self.registry;
        for descriptor in registry.iter() {
            for dependency in descriptor.depends_on() {
                if !self.values.contains(dependency) {
                    self.errors.push(ValidationError::missing(dependency.as_str()));
                }
            }

            let key = descriptor.key();
            if self.values.contains(key) {
                continue;
            }

            if descriptor.is_required() {
                self.errors.push(ValidationError::missing(key));
                continue;
            }

            match descriptor.default_value() {
                Some(default) => match coerce(descriptor.shape(), default) {
                    Some(v) => self.values.insert(key, v),
                    None => self.errors.push(ValidationError::new(
                        ValidationErrorKind::IncorrectType,
                        Some(default.to_string()),
                        key,
                    )),
                },
                None if descriptor.shape().is_flag() => {
                    self.values.insert(key, Value::Bool(false));
                }
                None => {}
            }
        }
    }
}

/// `true`/`false` in any ASCII case.
fn parse_bool(literal: &str) -> Option<bool> {
    if literal.eq_ignore_ascii_case("true") {
        Some(true)
    } else if literal.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn coerce(shape: &Shape, literal: &str) -> Option<Value> {
    match shape {
        Shape::Integer => literal.trim().parse().ok().map(Value::Integer),
        Shape::Real => literal.trim().parse().ok().map(Value::Real),
        Shape::Boolean | Shape::Flag | Shape::Help => parse_bool(literal).map(Value::Bool),
        _ => Some(Value::Text(literal.to_string())),
    }
}

/// Text form of an args file member, as if it had been typed on the command
/// line. `null` members are skipped.
fn member_text(member: serde_json::Value) -> Option<String> {
    match member {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
