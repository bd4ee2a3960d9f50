use std::env;
use std::fs;
use std::io;
use std::path::Path;

include!("../build_common.rs");

fn main() -> io::Result<()> {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").map_err(io::Error::other)?;
    render_readme(Path::new(&crate_dir))
}
