use rand::{Rng, SeedableRng, distr::Alphanumeric, rngs::StdRng};
use sockrpc::opcode::jenkins_lookup3;
use sockrpc::{op_code, rpc_op_code};
use std::collections::HashSet;

#[test]
fn test_lookup3_reference_vectors() {
    assert_eq!(jenkins_lookup3(b"", 0), 0xdead_beef);
    assert_eq!(
        jenkins_lookup3(b"Four score and seven years ago", 0),
        0x1777_0551
    );
    assert_eq!(
        jenkins_lookup3(b"Four score and seven years ago", 1),
        0xcd62_8161
    );
}

#[test]
fn test_op_code_is_deterministic() {
    let name = "hello.HelloService.SayHello";
    assert_eq!(op_code(name), op_code(name));
    assert_eq!(op_code(name), op_code(&name.to_string()));
}

#[test]
fn test_op_code_fits_in_32_bits() {
    for name in [
        "",
        "a",
        "Echo",
        "hello.HelloService.SayHello",
        "a.method.name.longer.than.twelve.bytes.to.cross.several.blocks",
    ] {
        assert!(op_code(name) <= u32::MAX as u64, "{name} overflowed 32 bits");
    }
}

#[test]
fn test_op_code_macro_matches_runtime_hash() {
    const WORD_COUNT: u64 = rpc_op_code!("taskqueue.WordCountService.WordCount");
    assert_eq!(WORD_COUNT, op_code("taskqueue.WordCountService.WordCount"));
}

#[test]
fn test_op_code_differs_for_every_tail_length() {
    // Exercise each tail length of the final block (1..=12 bytes) plus the
    // block boundary itself.
    let base = "abcdefghijklmnopqrstuvwxyz";
    let mut seen = HashSet::new();
    for len in 1..=base.len() {
        assert!(seen.insert(op_code(&base[..len])), "collision at {len}");
    }
}

#[test]
fn test_op_code_collisions_are_rare() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut names = HashSet::new();
    while names.len() < 10_000 {
        let len = rng.random_range(4..32);
        let method: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();
        names.insert(format!("pkg.Service.{method}"));
    }

    let mut codes = HashSet::new();
    let mut collisions = 0;
    for name in &names {
        if !codes.insert(op_code(name)) {
            collisions += 1;
        }
    }

    assert!(collisions <= 1, "{collisions} op-code collisions");
}
