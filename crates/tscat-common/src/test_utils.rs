//! Test utilities and shared fixtures for the tscat workspace.
//!
//! Enabled for downstream crates through the `testing` feature.

use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(any(test, feature = "tempfile"))]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `content` to `dir/name`, returning the full path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Qt Linguist catalog fixtures.
pub mod catalog_fixtures {
    /// An Indonesian catalog with finished translations, placeholders and
    /// an entity-escaped source.
    pub fn indonesian_catalog() -> &'static str {
        r#"<?xml version="1.0" ?><!DOCTYPE TS><TS language="id" sourcelanguage="" version="2.0">
<context>
    <name>@default</name>
    <message>
        <location filename="safe_interface.py" line="342"/>
        <source>No keywords file found for %s</source>
        <translation>Tidak ada berkas kata kunci ditemukan untuk %s</translation>
    </message>
    <message>
        <location filename="safe_interface.py" line="414"/>
        <source>Argument &quot;%s&quot; was not a valid layer instance</source>
        <translation>Argumen :%s: bukanlah objek lapisan yang valid</translation>
    </message>
</context>
<context>
    <name>Aggregator</name>
    <message>
        <location filename="aggregator.py" line="933"/>
        <source>Use default</source>
        <translation>Pergunakan default</translation>
    </message>
    <message>
        <location filename="aggregator.py" line="412"/>
        <source>%1 is %2 but it should be either vector or raster</source>
        <translation>%1 merupakan %2 tetapi itu seharusnya berupa layer vektor ataupun raster</translation>
    </message>
    <message>
        <location filename="aggregator.py" line="501"/>
        <source>%s aggregated to %s</source>
        <translation type="unfinished"/>
    </message>
</context>
<context>
    <name>KeywordsDialog</name>
    <message>
        <location filename="keywords_dialog.py" line="252"/>
        <source>Use default</source>
        <translation>Pergunakan default</translation>
    </message>
</context>
</TS>
"#
    }

    /// A Vietnamese catalog where nothing has been translated yet.
    pub fn vietnamese_catalog() -> &'static str {
        r#"<?xml version="1.0" ?><!DOCTYPE TS><TS language="vi" sourcelanguage="" version="2.0">
<context>
    <name>@default</name>
    <message>
        <location filename="safe_interface.py" line="342"/>
        <source>No keywords file found for %s</source>
        <translation type="unfinished"/>
    </message>
</context>
<context>
    <name>Aggregator</name>
    <message>
        <location filename="aggregator.py" line="933"/>
        <source>Use default</source>
        <translation type="unfinished"/>
    </message>
</context>
</TS>
"#
    }

    /// Build a single-context catalog document from `(source, translation)`
    /// pairs, all marked finished.
    pub fn single_context_catalog(language: &str, context: &str, messages: &[(&str, &str)]) -> String {
        let mut doc = format!(
            "<?xml version=\"1.0\" ?><!DOCTYPE TS><TS language=\"{language}\" version=\"2.0\">\n<context>\n    <name>{context}</name>\n"
        );
        for (source, translation) in messages {
            doc.push_str(&format!(
                "    <message>\n        <source>{source}</source>\n        <translation>{translation}</translation>\n    </message>\n"
            ));
        }
        doc.push_str("</context>\n</TS>\n");
        doc
    }
}
