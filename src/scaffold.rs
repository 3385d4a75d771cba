//! Declarative file/directory scaffolding.
//!
//! A [`Tree`] is an in-memory description of files and directories that
//! [`Tree::create`] writes under a root directory. Regular files are always
//! (over)written. Optional files are written once and then left alone: when
//! one already exists it is skipped and its warning is logged and reported.
//!
//! A [`Directory`] named `.` adds no level of its own; its children live in
//! the parent's location, both on disk and for path lookup.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::LayerfigError;

/// Name of a pass-through directory.
pub const CURRENT_DIR: &str = ".";

#[derive(Debug, Clone, PartialEq)]
pub struct File {
    name: String,
    content: String,
    optional: bool,
    warning: Option<String>,
}

impl File {
    /// A file that is rewritten on every [`Tree::create`].
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
            optional: false,
            warning: None,
        }
    }

    /// A file that is only written if it does not exist yet.
    pub fn optional(name: &str, content: &str) -> Self {
        Self {
            optional: true,
            ..Self::new(name, content)
        }
    }

    /// Message reported when an optional file is skipped.
    pub fn with_warning(mut self, message: &str) -> Self {
        self.warning = Some(message.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    name: String,
    children: Vec<Node>,
}

impl Directory {
    pub fn new(name: &str, children: Vec<Node>) -> Self {
        Self {
            name: name.to_string(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct child named `name`, looking through `.` directories.
    pub fn get(&self, name: &str) -> Option<&Node> {
        find_child(&self.children, name)
    }

    fn is_pass_through(&self) -> bool {
        self.name == CURRENT_DIR
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    File(File),
    Directory(Directory),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(f) => f.name(),
            Node::Directory(d) => d.name(),
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }
}

impl From<File> for Node {
    fn from(file: File) -> Self {
        Node::File(file)
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Node::Directory(dir)
    }
}

/// What [`Tree::create`] did with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file did not exist and was written.
    Created,
    /// A regular file already existed and was replaced.
    Overwritten,
    /// An optional file already existed and was left untouched.
    Skipped { warning: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Everything one [`Tree::create`] call touched, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateReport {
    pub directories: Vec<PathBuf>,
    pub files: Vec<FileReport>,
}

impl CreateReport {
    /// Outcome for the file written at `path`.
    pub fn outcome(&self, path: &Path) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| &f.outcome)
    }

    /// Optional files that were skipped, with their warnings.
    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Skipped { warning } => Some((f.path.as_path(), warning.as_str())),
            _ => None,
        })
    }
}

/// Ordered forest of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Find a node by `/`-separated path (`"parent/child/second.txt"`).
    ///
    /// Names match exactly. `.` segments and `.` directories are transparent,
    /// so `parent/file.txt` finds a file declared as `parent/./file.txt`.
    pub fn get(&self, path: &str) -> Option<&Node> {
        let mut segments = path
            .split('/')
            .filter(|s| !s.is_empty() && *s != CURRENT_DIR);
        let mut node = find_child(&self.nodes, segments.next()?)?;
        for segment in segments {
            node = node.as_directory()?.get(segment)?;
        }
        Some(node)
    }

    /// Like [`get`](Self::get), failing with [`LayerfigError::PathNotFound`].
    pub fn lookup(&self, path: &str) -> Result<&Node, LayerfigError> {
        self.get(path)
            .ok_or_else(|| LayerfigError::PathNotFound(path.to_string()))
    }

    /// Write the tree under `root`, depth-first in declaration order.
    ///
    /// Directories are created as needed (existing ones are fine). Not
    /// transactional: on a filesystem error, whatever was written stays.
    pub fn create(&self, root: impl AsRef<Path>) -> Result<CreateReport, LayerfigError> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|e| io_error(root, e))?;

        let mut report = CreateReport::default();
        create_nodes(&self.nodes, root, &mut report)?;
        tracing::debug!(
            root = %root.display(),
            directories = report.directories.len(),
            files = report.files.len(),
            "scaffold created"
        );
        Ok(report)
    }
}

fn find_child<'a>(children: &'a [Node], name: &str) -> Option<&'a Node> {
    for child in children {
        match child {
            Node::Directory(dir) if dir.is_pass_through() => {
                if let Some(found) = dir.get(name) {
                    return Some(found);
                }
            }
            _ if child.name() == name => return Some(child),
            _ => {}
        }
    }
    None
}

fn create_nodes(
    nodes: &[Node],
    target: &Path,
    report: &mut CreateReport,
) -> Result<(), LayerfigError> {
    for node in nodes {
        match node {
            Node::Directory(dir) if dir.is_pass_through() => {
                create_nodes(&dir.children, target, report)?;
            }
            Node::Directory(dir) => {
                let path = target.join(&dir.name);
                fs::create_dir_all(&path).map_err(|e| io_error(&path, e))?;
                report.directories.push(path.clone());
                create_nodes(&dir.children, &path, report)?;
            }
            Node::File(file) => {
                let path = target.join(&file.name);
                let outcome = write_file(file, &path)?;
                report.files.push(FileReport { path, outcome });
            }
        }
    }
    Ok(())
}

fn write_file(file: &File, path: &Path) -> Result<FileOutcome, LayerfigError> {
    if file.optional {
        return match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut handle) => {
                handle
                    .write_all(file.content.as_bytes())
                    .map_err(|e| io_error(path, e))?;
                Ok(FileOutcome::Created)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let warning = file.warning.clone().unwrap_or_else(|| {
                    format!("{} already exists, leaving it untouched", path.display())
                });
                tracing::warn!(path = %path.display(), "{warning}");
                Ok(FileOutcome::Skipped { warning })
            }
            Err(e) => Err(io_error(path, e)),
        };
    }

    let existed = path.exists();
    fs::write(path, &file.content).map_err(|e| io_error(path, e))?;
    Ok(if existed {
        FileOutcome::Overwritten
    } else {
        FileOutcome::Created
    })
}

fn io_error(path: &Path, source: std::io::Error) -> LayerfigError {
    LayerfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}
