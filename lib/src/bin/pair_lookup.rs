use std::{env, process::exit};

use nomenclator_lib::store::PairStore;

fn main() {
    let (path, name) = if let (Some(arg), Some(arg2)) = (env::args().nth(1), env::args().nth(2)) {
        (arg, arg2)
    } else {
        eprintln!("Usage: pair_lookup <db_file> <name>");
        exit(1);
    };

    let store = PairStore::open(path).expect("failed to open store");
    match store.get(&name).expect("failed to read store") {
        Some(key) => println!("{}", key.to_hex()),
        None => {
            eprintln!("no key stored for {}", name);
            exit(1);
        }
    }
}
