use std::process;

fn main() {
    match markdown_model_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-model error: {err:#}");
            process::exit(1);
        }
    }
}
