//! Project convention resolution for Cordova and React Native
//!
//! Turns a platform name plus the CWD into concrete build facts: package
//! directories, entry files, bundle names and the app-store version read from
//! the project manifest.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::ConventionError;

const CONFIG_XML: &str = "config.xml";
const PACKAGE_JSON: &str = "package.json";

/// Name of the temporary directory React Native bundles are written to
pub const REACT_OUTPUT_DIR_NAME: &str = "CodePush";

/// Platforms a Cordova project can be released for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CordovaPlatform {
    Ios,
    Android,
}

impl CordovaPlatform {
    pub fn parse(platform: &str) -> Result<Self, ConventionError> {
        match platform.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            _ => Err(ConventionError::UnsupportedCordovaPlatform),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }

    /// Web content directory produced by `cordova prepare|build`
    pub fn package_dir(self, cwd: &Path) -> PathBuf {
        let platform_dir = cwd.join("platforms").join(self.as_str());
        match self {
            Self::Ios => platform_dir.join("www"),
            Self::Android => platform_dir.join("assets").join("www"),
        }
    }
}

impl fmt::Display for CordovaPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platforms a React Native project can be bundled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactPlatform {
    Ios,
    Android,
    Windows,
}

impl ReactPlatform {
    pub fn parse(platform: &str) -> Result<Self, ConventionError> {
        match platform.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "windows" => Ok(Self::Windows),
            _ => Err(ConventionError::UnsupportedReactPlatform),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Windows => "windows",
        }
    }

    pub fn default_entry_file(self) -> String {
        format!("index.{}.js", self.as_str())
    }

    pub fn default_bundle_name(self) -> String {
        match self {
            Self::Ios => "main.jsbundle".to_string(),
            other => format!("index.{}.bundle", other.as_str()),
        }
    }
}

impl fmt::Display for ReactPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the root `<widget version="...">` attribute of `config.xml`
pub fn read_cordova_version(cwd: &Path) -> Result<String, ConventionError> {
    let unreadable = || ConventionError::ManifestUnreadable {
        manifest: CONFIG_XML,
        command: "release-cordova",
        framework: "Cordova",
    };

    let path = cwd.join(CONFIG_XML);
    let contents = fs::read_to_string(&path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "config.xml not readable");
        unreadable()
    })?;

    let root = root_element(&contents).ok_or_else(unreadable)?;
    version_attribute(root).ok_or(ConventionError::ManifestVersionMissing {
        manifest: CONFIG_XML,
    })
}

/// Read the `version` field of `package.json`
pub fn read_react_version(cwd: &Path) -> Result<String, ConventionError> {
    #[derive(Deserialize)]
    struct PackageManifest {
        version: Option<String>,
    }

    let unreadable = || ConventionError::ManifestUnreadable {
        manifest: PACKAGE_JSON,
        command: "release-react",
        framework: "React Native",
    };

    let path = cwd.join(PACKAGE_JSON);
    let contents = fs::read_to_string(&path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "package.json not readable");
        unreadable()
    })?;
    let manifest: PackageManifest = serde_json::from_str(&contents).map_err(|e| {
        debug!(path = %path.display(), error = %e, "package.json not parseable");
        unreadable()
    })?;

    manifest
        .version
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConventionError::ManifestVersionMissing {
            manifest: PACKAGE_JSON,
        })
}

/// Require a `package.json` in the CWD without reading its version
pub fn ensure_react_project(cwd: &Path) -> Result<(), ConventionError> {
    if cwd.join(PACKAGE_JSON).is_file() {
        Ok(())
    } else {
        Err(ConventionError::ManifestUnreadable {
            manifest: PACKAGE_JSON,
            command: "release-react",
            framework: "React Native",
        })
    }
}

/// Resolve the bundler entry file, checking an explicit one exists
pub fn resolve_entry_file(
    cwd: &Path,
    platform: ReactPlatform,
    entry_file: Option<&str>,
) -> Result<String, ConventionError> {
    match entry_file {
        Some(entry) => {
            if cwd.join(entry).exists() {
                Ok(entry.to_string())
            } else {
                Err(ConventionError::EntryFileMissing(entry.to_string()))
            }
        }
        None => Ok(platform.default_entry_file()),
    }
}

/// Contents of the first element tag that is not a declaration or comment
fn root_element(xml: &str) -> Option<&str> {
    let mut rest = xml;
    loop {
        let start = rest.find('<')?;
        rest = &rest[start..];
        if rest.starts_with("<?") {
            rest = &rest[rest.find("?>")? + 2..];
        } else if rest.starts_with("<!--") {
            rest = &rest[rest.find("-->")? + 3..];
        } else if rest.starts_with("<!") {
            rest = &rest[rest.find('>')? + 1..];
        } else {
            let end = rest.find('>')?;
            return Some(&rest[1..end]);
        }
    }
}

fn version_attribute(tag: &str) -> Option<String> {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = VERSION
        .get_or_init(|| Regex::new(r#"(?:^|\s)version\s*=\s*(?:"([^"]*)"|'([^']*)')"#).ok())
        .as_ref()?;

    let captures = re.captures(tag)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG_XML_FIXTURE: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<!-- Cordova project -->
<widget id="com.microsoft.codepush.test" version="0.0.1" xmlns="http://www.w3.org/ns/widgets" xmlns:cdv="http://cordova.apache.org/ns/1.0">
    <name>TestCodePush</name>
</widget>
"#;

    #[test]
    fn test_platform_parsing_is_case_insensitive() {
        assert_eq!(CordovaPlatform::parse("iOS").unwrap(), CordovaPlatform::Ios);
        assert_eq!(ReactPlatform::parse("Windows").unwrap(), ReactPlatform::Windows);
        assert_eq!(
            CordovaPlatform::parse("windows"),
            Err(ConventionError::UnsupportedCordovaPlatform)
        );
        assert_eq!(
            ReactPlatform::parse("blackberry"),
            Err(ConventionError::UnsupportedReactPlatform)
        );
    }

    #[test]
    fn test_react_defaults() {
        assert_eq!(ReactPlatform::Ios.default_bundle_name(), "main.jsbundle");
        assert_eq!(ReactPlatform::Android.default_bundle_name(), "index.android.bundle");
        assert_eq!(ReactPlatform::Windows.default_bundle_name(), "index.windows.bundle");
        assert_eq!(ReactPlatform::Ios.default_entry_file(), "index.ios.js");
    }

    #[test]
    fn test_cordova_package_dirs() {
        let cwd = Path::new("/project");
        assert_eq!(
            CordovaPlatform::Ios.package_dir(cwd),
            PathBuf::from("/project/platforms/ios/www")
        );
        assert_eq!(
            CordovaPlatform::Android.package_dir(cwd),
            PathBuf::from("/project/platforms/android/assets/www")
        );
    }

    #[test]
    fn test_reads_widget_version_not_xml_declaration() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.xml"), CONFIG_XML_FIXTURE).unwrap();

        assert_eq!(read_cordova_version(temp.path()).unwrap(), "0.0.1");
    }

    #[test]
    fn test_ignores_nested_version_attributes() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.xml"),
            r#"<widget id="x"><plugin name="p" version="9.9.9" /></widget>"#,
        )
        .unwrap();

        assert_eq!(
            read_cordova_version(temp.path()),
            Err(ConventionError::ManifestVersionMissing {
                manifest: "config.xml"
            })
        );
    }

    #[test]
    fn test_missing_config_xml() {
        let temp = TempDir::new().unwrap();
        let err = read_cordova_version(temp.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to find or read \"config.xml\" in the CWD. The \"release-cordova\" command must be executed in a Cordova project folder."
        );
    }

    #[test]
    fn test_reads_package_json_version() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{ "name": "testapp", "version": "1.2.3" }"#,
        )
        .unwrap();

        assert_eq!(read_react_version(temp.path()).unwrap(), "1.2.3");
        assert!(ensure_react_project(temp.path()).is_ok());
    }

    #[test]
    fn test_missing_package_json() {
        let temp = TempDir::new().unwrap();
        let err = read_react_version(temp.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to find or read \"package.json\" in the CWD. The \"release-react\" command must be executed in a React Native project folder."
        );
        assert!(ensure_react_project(temp.path()).is_err());
    }

    #[test]
    fn test_entry_file_resolution() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.js"), "").unwrap();

        assert_eq!(
            resolve_entry_file(temp.path(), ReactPlatform::Android, None).unwrap(),
            "index.android.js"
        );
        assert_eq!(
            resolve_entry_file(temp.path(), ReactPlatform::Android, Some("app.js")).unwrap(),
            "app.js"
        );
        let err = resolve_entry_file(temp.path(), ReactPlatform::Ios, Some("doesntexist.js"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Entry file \"doesntexist.js\" does not exist.");
    }
}
