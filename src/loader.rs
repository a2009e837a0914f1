//! # Documentation Loader
//!
//! Walks a local documentation checkout: entity pages under `entities/` and
//! method pages under `methods/` (one directory level per API group). Each
//! page's `---`-delimited YAML front matter contributes the title and
//! description; a page without front matter yields empty metadata.

use crate::error::AppResult;
use serde::Deserialize;
use std::path::Path;
use walkdir::WalkDir;

/// One loaded documentation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocFile {
    /// File stem (`Account`, `timelines`).
    pub name: String,
    /// Front-matter title, empty when absent.
    pub title: String,
    /// Front-matter description, empty when absent.
    pub description: String,
    /// Page body with the front matter stripped.
    pub body: String,
}

/// A method page together with its API group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPage {
    /// API group: the containing directory name, or the file stem for
    /// pages directly under `methods/`.
    pub group: String,
    /// The page itself.
    pub doc: DocFile,
}

/// Everything loaded from one documentation checkout.
#[derive(Debug, Clone, Default)]
pub struct DocSet {
    /// Entity pages, path order.
    pub entities: Vec<DocFile>,
    /// Method pages, path order.
    pub methods: Vec<MethodPage>,
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Loads every `.md` page under `<root>/entities` and `<root>/methods`.
///
/// Traversal is sorted by file name so the result (and everything generated
/// from it) is stable across runs and filesystems.
pub fn load_docs(root: &Path) -> AppResult<DocSet> {
    let mut set = DocSet::default();

    for entry in markdown_files(&root.join("entities")) {
        set.entities.push(read_doc_file(&entry)?);
    }

    let methods_root = root.join("methods");
    for entry in markdown_files(&methods_root) {
        let doc = read_doc_file(&entry)?;
        let group = entry
            .parent()
            .filter(|parent| *parent != methods_root.as_path())
            .and_then(|parent| parent.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| doc.name.clone());
        set.methods.push(MethodPage { group, doc });
    }

    Ok(set)
}

fn markdown_files(dir: &Path) -> Vec<std::path::PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect()
}

fn read_doc_file(path: &Path) -> AppResult<DocFile> {
    let raw = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (front, body) = split_front_matter(&raw);
    let meta: FrontMatter = match front {
        Some(front) => serde_yaml::from_str(front)?,
        None => FrontMatter::default(),
    };

    Ok(DocFile {
        name,
        title: meta.title.unwrap_or_default(),
        description: meta.description.unwrap_or_default(),
        body: body.to_string(),
    })
}

/// Splits `---`-delimited front matter off the top of a page.
fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw.strip_prefix("---\n") else {
        return (None, raw);
    };
    match rest.split_once("\n---\n") {
        Some((front, body)) => (Some(front), body),
        // An unterminated front-matter fence: treat the page as body-only.
        None => (None, raw),
    }
}
