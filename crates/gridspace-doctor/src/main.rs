#![forbid(unsafe_code)]

fn main() {
    let (log_json, result) = gridspace_doctor::run_from_env();
    if let Err(error) = result {
        if log_json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
