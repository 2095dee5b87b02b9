//! Tags injected into every record for the life of the process

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Default value of the `application` tag
pub const DEFAULT_APPLICATION: &str = "astra";

pub const APPLICATION_TAG: &str = "application";
pub const COMPONENT_TAG: &str = "component";

/// Fixed key/value pairs appended to every serialized record.
///
/// Tags are kept sorted by key so two runtimes with the same tags produce
/// identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalTags {
    tags: BTreeMap<String, String>,
}

impl GlobalTags {
    /// Tags holding an application and a component identifier
    pub fn new(application: impl Into<String>, component: impl Into<String>) -> Self {
        Self::empty()
            .with_tag(APPLICATION_TAG, application)
            .with_tag(COMPONENT_TAG, component)
    }

    pub fn empty() -> Self {
        Self {
            tags: BTreeMap::new(),
        }
    }

    /// Tags derived from the running process: the default application name
    /// and the file name of the executable.
    pub fn for_process() -> &'static GlobalTags {
        static PROCESS_TAGS: OnceLock<GlobalTags> = OnceLock::new();
        PROCESS_TAGS.get_or_init(|| GlobalTags::new(DEFAULT_APPLICATION, process_component()))
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Component name for the current executable, e.g. `usersapi` for `/go/bin/usersapi`
pub fn process_component() -> String {
    std::env::args()
        .next()
        .map(|arg0| component_from_program(&arg0))
        .unwrap_or_default()
}

/// Strip the directory part of a program path
pub fn component_from_program(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_from_program() {
        assert_eq!(component_from_program("/go/bin/usersapi"), "usersapi");
        assert_eq!(component_from_program("usersapi"), "usersapi");
        assert_eq!(component_from_program("./target/debug/svc"), "svc");
    }

    #[test]
    fn test_tags_iterate_sorted() {
        let tags = GlobalTags::new("app", "comp").with_tag("region", "eu");
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["application", "component", "region"]);
    }

    #[test]
    fn test_process_tags() {
        let tags = GlobalTags::for_process();
        assert_eq!(tags.get(APPLICATION_TAG), Some(DEFAULT_APPLICATION));
        assert!(tags.get(COMPONENT_TAG).is_some());
        assert!(std::ptr::eq(tags, GlobalTags::for_process()));
    }
}
