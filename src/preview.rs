use crate::vfs::{VirtualFS, VirtualPath};
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write;
use std::rc::Rc;

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    /// Blob name and size, for files.
    blob: Option<(String, usize)>,
}
impl TreeNode {
    fn new(name: String, blob: Option<(String, usize)>) -> Self {
        Self {
            name,
            children: Vec::new(),
            blob,
        }
    }
}

/// Build the directory tree from the VFS entries, returning the root node.
fn build_tree(vfs: &VirtualFS, root_name: &str, blob_prefix: &str) -> Rc<RefCell<TreeNode>> {
    let root = Rc::new(RefCell::new(TreeNode::new(root_name.to_string(), None)));

    // map virtual path to node
    let mut lookup: HashMap<VirtualPath, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(VirtualPath::root(), Rc::clone(&root));

    // entries come in pre-order, so a parent is always registered before its children
    for entry in &vfs.entries {
        let (Some(parent_path), Some(name)) = (entry.path.parent(), entry.path.file_name()) else {
            continue;
        };

        let Some(parent_node) = lookup.get(&parent_path).map(Rc::clone) else {
            log::debug!("parent: {}, not found for path: {}", parent_path, entry.path);
            continue;
        };

        let blob = entry
            .blob()
            .map(|blob| (blob.name(blob_prefix), blob.content.len()));

        let new_child = Rc::new(RefCell::new(TreeNode::new(name.to_string(), blob)));

        parent_node
            .borrow_mut()
            .children
            .push(Rc::clone(&new_child));

        lookup.insert(entry.path.clone(), new_child);
    }

    root
}

fn write_tree(out: &mut String, node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    };
    let label = match &node_borrow.blob {
        Some((blob, size)) => format!(
            "{} {}",
            node_borrow.name.green(),
            format!("({}, {})", blob, plural(*size, "byte", "bytes")).dimmed()
        ),
        None => node_borrow.name.blue().to_string(),
    };
    let _ = writeln!(out, "{}{}{}", prefix.yellow(), connector, label);

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        let last = i == len - 1;
        write_tree(out, child, &child_prefix, last);
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

/// One-line totals for the image, e.g. `1 directory, 2 files, 2 bytes embedded`.
fn summarize(vfs: &VirtualFS) -> String {
    let total: usize = vfs
        .files()
        .filter_map(|entry| entry.blob())
        .map(|blob| blob.content.len())
        .sum();

    format!(
        "{}, {}, {} embedded",
        plural(vfs.directories().count(), "directory", "directories"),
        plural(vfs.blob_count(), "file", "files"),
        plural(total, "byte", "bytes")
    )
}

/// Renders the image as an ASCII tree, one line per entry.
pub fn render_tree(vfs: &VirtualFS, root_name: &str, blob_prefix: &str) -> String {
    let tree_root = build_tree(vfs, root_name, blob_prefix);

    let mut out = String::new();
    write_tree(&mut out, &tree_root, "", true);

    out
}

pub fn preview_as_tree(vfs: &VirtualFS, root_name: &str, blob_prefix: &str) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    print!("{}", render_tree(vfs, root_name, blob_prefix));

    let fancy_prompt = format!(
        "\n{} {}\n",
        "└─".bold().bright_blue(),
        summarize(vfs).bright_green()
    );

    println!("{}", fancy_prompt);
}
