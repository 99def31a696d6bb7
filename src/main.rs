// This binary crate is intentionally minimal.
// All autodiff and training logic lives in the library (src/lib.rs and its modules).
// Run demos with:
//   cargo run --example xor
//   cargo run --example two_class
fn main() {
    println!("magnetite-grad: a from-scratch reverse-mode autodiff engine in Rust.");
    println!("Run `cargo run --example xor` or `cargo run --example two_class` for demos.");
}
