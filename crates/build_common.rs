// README-to-rustdoc link rewriting shared by every crate's build script.
// Pulled in with: include!("../build_common.rs");
//
// The including file must import:
//   use std::env;
//   use std::fs;
//   use std::io;
//   use std::path::Path;

/// Copy `README.md` to `$OUT_DIR/README_GENERATED.md` with links rustdoc can resolve.
///
/// | README link | rustdoc link |
/// |---|---|
/// | `src/state.rs`, `src/handlers/mod.rs` | `state`, `handlers` |
/// | `../flamelab-core/README.md` | `flamelab_core` |
/// | `../../docs/x.md` | `<repository>/blob/main/docs/x.md` |
fn render_readme(crate_dir: &Path) -> io::Result<()> {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;
    let dest = Path::new(&out_dir).join("README_GENERATED.md");

    let content = match fs::read_to_string(crate_dir.join("README.md")) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    let repo_url = workspace_repository(crate_dir);
    fs::write(dest, rewrite_links(&content, repo_url.as_deref()))
}

fn rewrite_links(markdown: &str, repo_url: Option<&str>) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut rest = markdown;
    while let Some(start) = rest.find("](") {
        let (before, after) = rest.split_at(start + 2);
        out.push_str(before);
        let Some(end) = after.find(')') else {
            rest = after;
            break;
        };
        out.push_str(&rewrite_target(&after[..end], repo_url));
        rest = &after[end..];
    }
    out.push_str(rest);
    out
}

fn rewrite_target(target: &str, repo_url: Option<&str>) -> String {
    if let Some(module) = target.strip_prefix("src/") {
        let module = module
            .strip_suffix("/mod.rs")
            .or_else(|| module.strip_suffix(".rs"))
            .unwrap_or(module);
        return module.replace('/', "::");
    }
    if let Some(path) = target.strip_prefix("../../")
        && let Some(url) = repo_url
    {
        return format!("{url}/blob/main/{path}");
    }
    if let Some(sibling) = target
        .strip_prefix("../")
        .and_then(|t| t.strip_suffix("/README.md"))
    {
        return sibling.replace('-', "_");
    }
    target.to_string()
}

/// `repository = "..."` from the workspace manifest.
fn workspace_repository(crate_dir: &Path) -> Option<String> {
    let manifest = crate_dir.parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(manifest).ok()?;
    content.lines().find_map(|line| {
        let value = line.trim().strip_prefix("repository")?.trim_start();
        let value = value.strip_prefix('=')?.trim();
        Some(value.trim_matches('"').to_string())
    })
}
