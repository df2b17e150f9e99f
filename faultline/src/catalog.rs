//! User-message catalog.
//!
//! Loaded once per reporter from the remote definition-list service and
//! never refreshed. A failed or empty load collapses to a single-entry
//! fallback mapping so lookups always succeed.

use crate::codes;
use crate::transport::DefinitionTransport;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Message used when no definitions could be loaded. Also the last-resort
/// lookup result if a loaded mapping omits the conventional
/// `SYS_LOGGING_FAILURE` entry.
pub const FALLBACK_DEFINITION_MESSAGE: &str = "Fatal failure in logging.  No definitions loaded.";

/// Immutable code-to-message mapping.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    entries: HashMap<String, String>,
}

impl MessageCatalog {
    /// Loads the catalog from the definition-list service.
    ///
    /// Never fails: a transport error or an empty result yields the
    /// fallback catalog instead.
    pub fn load(transport: &dyn DefinitionTransport, application_id: u32) -> Self {
        match transport.definitions(application_id) {
            Ok(definitions) if !definitions.is_empty() => {
                debug!(
                    application_id,
                    count = definitions.len(),
                    "loaded error definitions"
                );
                let entries = definitions
                    .into_iter()
                    .map(|def| (def.code, def.message))
                    .collect();
                Self { entries }
            }
            Ok(_) => {
                warn!(application_id, "definition list was empty, using fallback");
                Self::fallback()
            }
            Err(err) => {
                warn!(application_id, error = %err, "definition list load failed, using fallback");
                Self::fallback()
            }
        }
    }

    /// The single-entry fallback catalog.
    pub fn fallback() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            codes::SYS_LOGGING_FAILURE.to_string(),
            FALLBACK_DEFINITION_MESSAGE.to_string(),
        );
        Self { entries }
    }

    /// Returns the user message for `code`.
    ///
    /// Unknown codes resolve to the `SYS_LOGGING_FAILURE` entry, which is
    /// defined by convention in every real definition list and always
    /// present in the fallback catalog.
    pub fn lookup(&self, code: &str) -> &str {
        self.entries
            .get(code)
            .or_else(|| self.entries.get(codes::SYS_LOGGING_FAILURE))
            .map(String::as_str)
            .unwrap_or(FALLBACK_DEFINITION_MESSAGE)
    }

    /// Number of loaded definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDefinitionTransport;

    #[test]
    fn test_load_builds_mapping_from_definitions() {
        let transport = MockDefinitionTransport::with_definitions(vec![
            ("APP_DB_ERROR", "A database error occurred."),
            ("SYS_LOGGING_FAILURE", "Logging is down."),
        ]);
        let catalog = MessageCatalog::load(&transport, 3);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("APP_DB_ERROR"), "A database error occurred.");
    }

    #[test]
    fn test_load_queries_the_service_exactly_once() {
        let transport = MockDefinitionTransport::with_definitions(vec![(
            "SYS_LOGGING_FAILURE",
            "Logging is down.",
        )]);
        let catalog = MessageCatalog::load(&transport, 3);

        assert_eq!(transport.calls(), 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_unknown_code_falls_back_to_logging_failure_entry() {
        let transport = MockDefinitionTransport::with_definitions(vec![
            ("APP_DB_ERROR", "A database error occurred."),
            ("SYS_LOGGING_FAILURE", "Logging is down."),
        ]);
        let catalog = MessageCatalog::load(&transport, 3);

        assert_eq!(catalog.lookup("NO_SUCH_CODE"), "Logging is down.");
        assert_eq!(
            catalog.lookup("NO_SUCH_CODE"),
            catalog.lookup(codes::SYS_LOGGING_FAILURE)
        );
    }

    #[test]
    fn test_failed_load_collapses_to_fallback() {
        let transport = MockDefinitionTransport::unavailable();
        let catalog = MessageCatalog::load(&transport, 3);

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.lookup(codes::SYS_LOGGING_FAILURE),
            FALLBACK_DEFINITION_MESSAGE
        );
        assert_eq!(catalog.lookup("ANY_OTHER_CODE"), FALLBACK_DEFINITION_MESSAGE);
    }

    #[test]
    fn test_empty_result_collapses_to_fallback() {
        let transport = MockDefinitionTransport::with_definitions(vec![]);
        let catalog = MessageCatalog::load(&transport, 3);
        assert_eq!(
            catalog.lookup(codes::SYS_LOGGING_FAILURE),
            FALLBACK_DEFINITION_MESSAGE
        );
    }

    #[test]
    fn test_lookup_survives_mapping_without_conventional_entry() {
        // A real list that violates the SYS_LOGGING_FAILURE convention:
        // unknown codes still resolve to the fixed fallback text.
        let transport =
            MockDefinitionTransport::with_definitions(vec![("APP_DB_ERROR", "A database error.")]);
        let catalog = MessageCatalog::load(&transport, 3);
        assert_eq!(catalog.lookup("NO_SUCH_CODE"), FALLBACK_DEFINITION_MESSAGE);
    }
}
