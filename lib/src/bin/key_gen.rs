use std::process::exit;

use nomenclator_lib::key::KeyGenerator;

fn main() {
    match KeyGenerator::new_key() {
        Ok(key) => println!("{}", key.to_hex()),
        Err(e) => {
            eprintln!("key generation failed: {}", e);
            exit(1);
        }
    }
}
