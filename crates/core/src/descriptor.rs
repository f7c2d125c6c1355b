//! Bundle descriptor (`Info.plist`) rendering and writing.
//!
//! Pure render plus a single file write; nothing here mutates other state.

use std::path::Path;

use tracing::debug;

use chm2docset_shared::{BundleDescriptor, DocsetError, Result, WELCOME_PAGE};

/// Render the descriptor as plist XML.
///
/// The identifier is already sanitized to a safe character set; the display
/// fields are escaped as XML text.
pub fn render(descriptor: &BundleDescriptor) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
  <dict>
    <key>dashIndexFilePath</key>
    <string>{welcome}</string>
    <key>CFBundleIdentifier</key>
    <string>{identifier}</string>
    <key>CFBundleName</key>
    <string>{name}</string>
    <key>DocSetPlatformFamily</key>
    <string>{platform}</string>
    <key>isDashDocset</key>
    <true/>
  </dict>
</plist>
"#,
        welcome = WELCOME_PAGE,
        identifier = descriptor.identifier,
        name = html_escape::encode_text(&descriptor.display_name),
        platform = html_escape::encode_text(&descriptor.platform_family),
    )
}

/// Write the rendered descriptor to `path`.
pub fn write(descriptor: &BundleDescriptor, path: &Path) -> Result<()> {
    std::fs::write(path, render(descriptor)).map_err(|e| DocsetError::io(path, e))?;
    debug!(path = %path.display(), identifier = %descriptor.identifier, "wrote bundle descriptor");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_identity_and_welcome_page() {
        let descriptor = BundleDescriptor::for_source("Foo Bar", "macos");
        let plist = render(&descriptor);

        assert!(plist.contains("<string>Welcome.htm</string>"));
        assert!(plist.contains("<string>io.ngs.documentation.FooBar</string>"));
        assert!(plist.contains("<string>Foo Bar</string>"));
        assert!(plist.contains("<string>macos</string>"));
        assert!(plist.contains("<key>isDashDocset</key>"));
    }

    #[test]
    fn display_fields_are_xml_escaped() {
        let descriptor = BundleDescriptor::for_source("Tips & <Tricks>", "unknown");
        let plist = render(&descriptor);

        assert!(plist.contains("Tips &amp; &lt;Tricks&gt;"));
        // The identifier never needs escaping: sanitization already removed
        // everything outside its safe character set.
        assert!(plist.contains("<string>io.ngs.documentation.TipsTricks</string>"));
    }

    #[test]
    fn write_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Info.plist");
        let descriptor = BundleDescriptor::for_source("manual", "unknown");

        write(&descriptor, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml"));
        assert!(content.contains("io.ngs.documentation.manual"));
    }

    #[test]
    fn write_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("Info.plist");
        let descriptor = BundleDescriptor::for_source("manual", "unknown");

        let err = write(&descriptor, &path).unwrap_err();
        assert!(matches!(err, DocsetError::Io { .. }));
    }
}
