//! Placeholder substitution in cloned template files

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};

use crate::core::{CmdrError, CmdrResult};

/// A `(locate, substitute)` rule. Only the first match is replaced and the
/// replacement is inserted literally.
#[derive(Debug, Clone)]
pub struct Substitution {
    locate: Regex,
    replacement: String,
}

impl Substitution {
    /// Rule with a regex locator
    pub fn new(pattern: &str, replacement: impl Into<String>) -> CmdrResult<Self> {
        Ok(Self {
            locate: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Rule matching `find` as a whole line
    pub fn line(find: &str, replacement: impl Into<String>) -> CmdrResult<Self> {
        Self::new(&format!(r"(?mR)^{}[ \t]*$", regex::escape(find)), replacement)
    }

    /// Rule matching `find` anywhere
    pub fn literal(find: &str, replacement: impl Into<String>) -> CmdrResult<Self> {
        Self::new(&regex::escape(find), replacement)
    }

    pub fn apply(&self, content: &str) -> String {
        self.locate
            .replace(content, NoExpand(&self.replacement))
            .into_owned()
    }
}

/// Substitutions for one file, relative to the project root
#[derive(Debug, Clone)]
pub struct FileRewrite {
    pub path: PathBuf,
    pub rules: Vec<Substitution>,
}

impl FileRewrite {
    pub fn new(path: impl Into<PathBuf>, rules: Vec<Substitution>) -> Self {
        Self {
            path: path.into(),
            rules,
        }
    }

    /// Apply every rule in order
    pub fn apply_to(&self, content: &str) -> String {
        self.rules
            .iter()
            .fold(content.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Rewrite the file under `root` in place
    pub async fn apply(&self, root: &Path) -> CmdrResult<()> {
        let path = root.join(&self.path);
        let content = read_template_file(&path).await?;
        tokio::fs::write(&path, self.apply_to(&content)).await?;
        tracing::debug!("rewrote {}", path.display());
        Ok(())
    }
}

/// Set the top-level `name` of a package manifest, keeping everything else
pub fn set_package_name(manifest: &str, name: &str) -> CmdrResult<String> {
    let mut pkg: serde_json::Value = serde_json::from_str(manifest)?;
    let object = pkg
        .as_object_mut()
        .ok_or_else(|| CmdrError::other("package.json is not a JSON object"))?;
    object.insert("name".to_string(), serde_json::Value::String(name.to_string()));

    let mut out = serde_json::to_string_pretty(&pkg)?;
    out.push('\n');
    Ok(out)
}

/// Patch `package.json` under `root` with the project name
pub async fn patch_package_name(root: &Path, name: &str) -> CmdrResult<()> {
    let path = root.join("package.json");
    let content = read_template_file(&path).await?;
    tokio::fs::write(&path, set_package_name(&content, name)?).await?;
    Ok(())
}

async fn read_template_file(path: &Path) -> CmdrResult<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(CmdrError::MissingTemplateFile(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn readme_rewrite(name: &str) -> FileRewrite {
        FileRewrite::new(
            "README.md",
            vec![
                Substitution::line("# Platform API", format!("# {}", name)).unwrap(),
                Substitution::literal(
                    "git clone https://github.com/parraletz/fastapi-template.git",
                    "git clone YOUR_REPOSITORY_URL",
                )
                .unwrap(),
            ],
        )
    }

    const README: &str = "# Platform API\n\nSetup:\n\n    git clone https://github.com/parraletz/fastapi-template.git\n\n# Platform API internals\n";

    #[test]
    fn test_rewrite_is_scoped() {
        let out = readme_rewrite("billing").apply_to(README);
        assert_eq!(
            out,
            "# billing\n\nSetup:\n\n    git clone YOUR_REPOSITORY_URL\n\n# Platform API internals\n"
        );
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let rewrite = readme_rewrite("Platform API v2");
        let once = rewrite.apply_to(README);
        assert_eq!(rewrite.apply_to(&once), once);
    }

    #[test]
    fn test_replacement_is_literal() {
        let rewrite = readme_rewrite("$1-cash${0}");
        let out = rewrite.apply_to(README);
        assert!(out.starts_with("# $1-cash${0}\n"));
    }

    #[test]
    fn test_line_rule_handles_crlf() {
        let rule = Substitution::line("# Platform API", "# orders").unwrap();
        assert_eq!(rule.apply("# Platform API\r\nbody\r\n"), "# orders\r\nbody\r\n");
    }

    #[test]
    fn test_set_package_name_keeps_other_fields() {
        let manifest = r#"{
  "name": "express-typescript-service-template",
  "version": "1.4.0",
  "scripts": {
    "dev": "tsx watch src/index.ts"
  }
}"#;
        let out = set_package_name(manifest, "orders-api").unwrap();
        assert_eq!(
            out,
            "{\n  \"name\": \"orders-api\",\n  \"version\": \"1.4.0\",\n  \"scripts\": {\n    \"dev\": \"tsx watch src/index.ts\"\n  }\n}\n"
        );
        assert_eq!(set_package_name(&out, "orders-api").unwrap(), out);
    }

    #[test]
    fn test_set_package_name_rejects_non_object() {
        assert!(set_package_name("[1, 2]", "x").is_err());
        assert!(matches!(set_package_name("{ nope", "x"), Err(CmdrError::Json(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = readme_rewrite("x").apply(dir.path()).await.unwrap_err();
        assert!(matches!(err, CmdrError::MissingTemplateFile(_)));
    }
}
