/// Partstamp - interactive STL viewer with surface picking
///
/// Controls:
///   - Arrow Keys: Rotate the model
///   - +/-: Zoom in/out
///   - Mouse: Hover to read the surface point under the cursor
///   - Q/ESC: Quit

use clap::{Arg, Command};
use partstamp_core::{normalize, stl, Mesh};
use partstamp_terminal::ViewerApp;
use std::fs;
use std::io;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("partstamp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive STL viewer with surface picking")
        .arg(Arg::new("path").help("STL file to view (built-in cube when omitted)"))
        .get_matches();

    let mesh = match matches.get_one::<String>("path") {
        Some(path) => load_stl(path)?,
        None => {
            log::info!("No STL file provided, using built-in cube");
            Mesh::cube(2.0)
        }
    };

    let params = normalize(&mesh).map_err(|e| {
        log::error!("Cannot view mesh: {e}");
        io::Error::new(io::ErrorKind::InvalidData, e.to_string())
    })?;
    log::info!(
        "Loaded {} triangles, center ({:.3}, {:.3}, {:.3}), scale {:.4}",
        mesh.triangles.len(),
        params.center.x,
        params.center.y,
        params.center.z,
        params.scale
    );

    let mut app = ViewerApp::new(mesh, params)?;
    app.run()
}

fn load_stl(path: &str) -> io::Result<Mesh> {
    log::info!("Loading STL file: {path}");
    let data = fs::read(path).map_err(|e| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("Failed to read STL file: {e}"),
        )
    })?;
    stl::parse_stl(&data).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to parse STL: {e}"),
        )
    })
}
