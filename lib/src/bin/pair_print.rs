use std::{env, process::exit};

use nomenclator_lib::store::PairStore;

fn main() {
    let path = if let Some(arg) = env::args().nth(1) {
        arg
    } else {
        eprintln!("Usage: pair_print <db_file>");
        exit(1);
    };

    let store = PairStore::open(&path).expect("failed to open store");
    let pairs = store.pairs().expect("failed to read pairs");
    for pair in &pairs {
        println!("{} {}", pair.name, pair.key.to_hex());
    }
    eprintln!("{} pairs in {}", pairs.len(), path);
}
