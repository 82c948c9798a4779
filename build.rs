/// Build script: bake a default licensing server address into the binary
///
/// Reads `LICENSE_DEFAULT_SERVER_URL` from the environment or from a `.env`
/// file in the crate root and passes it to rustc. Without it the default
/// stays `http://localhost:5000`.

const KEY: &str = "LICENSE_DEFAULT_SERVER_URL";

fn main() {
    println!("cargo:rerun-if-env-changed={}", KEY);

    if let Ok(value) = std::env::var(KEY) {
        emit(&value);
        return;
    }

    let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let env_path = std::path::Path::new(&manifest_dir).join(".env");
    println!("cargo:rerun-if-changed={}", env_path.display());

    // Read .env manually (avoid extra dependencies in build script)
    let Ok(contents) = std::fs::read_to_string(&env_path) else {
        return;
    };

    for line in contents.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == KEY {
                emit(value.trim().trim_matches('"').trim_matches('\''));
            }
        }
    }
}

fn emit(value: &str) {
    if !value.is_empty() {
        println!("cargo:rustc-env={}={}", KEY, value);
    }
}
