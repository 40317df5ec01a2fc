use chisel_dom::{Encoding, JsonValue, Parser, Pointer};
use std::{env, fs, process};

/// Print the pointer of every value in `value`, depth first, checking each one resolves back to
/// the value it was built from
fn walk(root: &JsonValue, value: &JsonValue, pointer: &mut Pointer) {
    match root.at(&*pointer) {
        Ok(found) if found == value => println!("{}", pointer),
        _ => eprintln!("{} did not resolve", pointer),
    }
    match value {
        JsonValue::Map(map) => {
            for (key, member) in map {
                pointer.push_name(key);
                walk(root, member, pointer);
                pointer.pop();
            }
        }
        JsonValue::Array(array) => {
            for (index, element) in array.iter().enumerate() {
                pointer.push_index(index);
                walk(root, element, pointer);
                pointer.pop();
            }
        }
        _ => (),
    }
}

/// Extract all the pointers from a given document
fn main() {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "fixtures/json/valid/simple_structure.json".to_string());
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("unable to read {}: {}", path, err);
            process::exit(1);
        }
    };
    match Parser::with_encoding(Encoding::Utf8).parse_bytes(&bytes) {
        Ok(root) => walk(&root, &root, &mut Pointer::default()),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
