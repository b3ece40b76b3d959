//! Declarative install specifications.
//!
//! An [`InstallSpec`] is either one literal shell command, or an ordered
//! mapping from installer kind (`pip`, `go`, `binary`, a package manager
//! name, an OS name) to a [`SpecValue`].

/// Prefix that marks a `pip` value as a complete command rather than a
/// requirements filename.
pub const PIP_COMMAND_PREFIX: &str = "pip install";

/// The value stored under one installer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecValue {
    /// A command, a package name, or a filename.
    Single(String),
    /// A list of package names.
    List(Vec<String>),
}

impl SpecValue {
    /// Render as one shell string (lists are space-joined).
    pub fn as_command(&self) -> String {
        match self {
            SpecValue::Single(s) => s.clone(),
            SpecValue::List(items) => items.join(" "),
        }
    }

    /// Whether the value carries nothing usable.
    pub fn is_empty(&self) -> bool {
        match self {
            SpecValue::Single(s) => s.trim().is_empty(),
            SpecValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }
}

impl From<&str> for SpecValue {
    fn from(value: &str) -> Self {
        SpecValue::Single(value.to_string())
    }
}

impl From<String> for SpecValue {
    fn from(value: String) -> Self {
        SpecValue::Single(value)
    }
}

impl From<Vec<&str>> for SpecValue {
    fn from(values: Vec<&str>) -> Self {
        SpecValue::List(values.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for SpecValue {
    fn from(values: Vec<String>) -> Self {
        SpecValue::List(values)
    }
}

/// How the `pip` entry of a spec should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipEntry<'a> {
    /// Explicit package names.
    Packages(&'a [String]),
    /// A full `pip install ...` command.
    Command(&'a str),
    /// A requirements manifest, relative to the tool directory.
    Manifest(&'a str),
}

/// How to install a tool's dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallSpec {
    /// Run this command as-is.
    Command(String),
    /// Per-installer options, in declaration order.
    Options(Vec<(String, SpecValue)>),
}

impl InstallSpec {
    /// A spec that is a single literal command.
    pub fn command(command: impl Into<String>) -> Self {
        InstallSpec::Command(command.into())
    }

    /// Build an options spec from `(key, value)` pairs, keeping their order.
    ///
    /// A later duplicate key replaces the earlier value in place.
    pub fn options<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SpecValue>,
    {
        let mut entries: Vec<(String, SpecValue)> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
        }
        InstallSpec::Options(entries)
    }

    /// Look up an installer key.
    pub fn get(&self, key: &str) -> Option<&SpecValue> {
        match self {
            InstallSpec::Command(_) => None,
            InstallSpec::Options(entries) => {
                entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
        }
    }

    /// Whether an installer key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Installer keys in declaration order.
    pub fn keys(&self) -> Vec<String> {
        match self {
            InstallSpec::Command(_) => vec!["manual command".to_string()],
            InstallSpec::Options(entries) => entries.iter().map(|(k, _)| k.clone()).collect(),
        }
    }

    /// Classify the `pip` entry, if any.
    pub fn pip_entry(&self) -> Option<PipEntry<'_>> {
        match self.get("pip")? {
            SpecValue::List(packages) => Some(PipEntry::Packages(packages)),
            SpecValue::Single(value) if value.starts_with(PIP_COMMAND_PREFIX) => {
                Some(PipEntry::Command(value))
            }
            SpecValue::Single(value) => Some(PipEntry::Manifest(value)),
        }
    }
}
