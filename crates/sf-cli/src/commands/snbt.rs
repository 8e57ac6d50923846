use sf_compiler::render_snbt_errors;
use sf_nbt::{NbtError, parse_snbt};

pub fn run(text: &str) -> Result<(), String> {
    match parse_snbt(text) {
        Ok(tag) => {
            println!("{tag}");
            Ok(())
        }
        Err(NbtError::Snbt(errors)) => {
            eprint!("{}", render_snbt_errors(text, "<input>", &errors));
            Err(format!(
                "invalid SNBT ({} error{})",
                errors.len(),
                super::plural(errors.len())
            ))
        }
        Err(e) => Err(e.to_string()),
    }
}
