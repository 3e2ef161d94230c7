use crate::constants::OPCODE_HASH_SEED;

/// Fixed-width identifier of a remote method, derived from its full name.
///
/// Only the low 32 bits are ever populated; the value is widened to 64 bits
/// so that it occupies one aligned wire integer.
pub type OpCode = u64;

/// Computes the op-code for a fully-qualified method name
/// (e.g. `"hello.HelloService.SayHello"`).
///
/// The result is deterministic across processes, platforms and runs, which
/// is what lets a caller and a listener agree on op-codes without any
/// handshake. Distinct names may still collide; a listener does not detect
/// that, so keep the method set registered on one listener small enough for
/// 32 bits to stay comfortably sparse.
pub const fn op_code(full_name: &str) -> OpCode {
    jenkins_lookup3(full_name.as_bytes(), OPCODE_HASH_SEED) as OpCode
}

/// Bob Jenkins' lookup3 `hashlittle`, reading the key byte by byte so the
/// result is independent of host endianness and alignment.
pub const fn jenkins_lookup3(key: &[u8], initval: u32) -> u32 {
    let mut length = key.len();
    let init = 0xdead_beef_u32
        .wrapping_add(length as u32)
        .wrapping_add(initval);
    let (mut a, mut b, mut c) = (init, init, init);

    let mut offset = 0;
    while length > 12 {
        a = a.wrapping_add(read_le_word(key, offset, 4));
        b = b.wrapping_add(read_le_word(key, offset + 4, 4));
        c = c.wrapping_add(read_le_word(key, offset + 8, 4));
        let (mixed_a, mixed_b, mixed_c) = mix(a, b, c);
        a = mixed_a;
        b = mixed_b;
        c = mixed_c;
        offset += 12;
        length -= 12;
    }

    // Zero-length keys skip the final avalanche entirely.
    if length == 0 {
        return c;
    }

    let tail_a = if length >= 4 { 4 } else { length };
    let tail_b = if length >= 8 { 4 } else if length > 4 { length - 4 } else { 0 };
    let tail_c = if length > 8 { length - 8 } else { 0 };

    a = a.wrapping_add(read_le_word(key, offset, tail_a));
    b = b.wrapping_add(read_le_word(key, offset + 4, tail_b));
    c = c.wrapping_add(read_le_word(key, offset + 8, tail_c));

    let (_, _, c) = final_mix(a, b, c);
    c
}

/// Assembles up to four bytes starting at `offset` into a little-endian word.
const fn read_le_word(key: &[u8], offset: usize, count: usize) -> u32 {
    let mut word = 0u32;
    let mut i = 0;
    while i < count {
        word |= (key[offset + i] as u32) << (8 * i);
        i += 1;
    }
    word
}

const fn mix(mut a: u32, mut b: u32, mut c: u32) -> (u32, u32, u32) {
    a = a.wrapping_sub(c);
    a ^= c.rotate_left(4);
    c = c.wrapping_add(b);
    b = b.wrapping_sub(a);
    b ^= a.rotate_left(6);
    a = a.wrapping_add(c);
    c = c.wrapping_sub(b);
    c ^= b.rotate_left(8);
    b = b.wrapping_add(a);
    a = a.wrapping_sub(c);
    a ^= c.rotate_left(16);
    c = c.wrapping_add(b);
    b = b.wrapping_sub(a);
    b ^= a.rotate_left(19);
    a = a.wrapping_add(c);
    c = c.wrapping_sub(b);
    c ^= b.rotate_left(4);
    b = b.wrapping_add(a);
    (a, b, c)
}

const fn final_mix(mut a: u32, mut b: u32, mut c: u32) -> (u32, u32, u32) {
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(14));
    a ^= c;
    a = a.wrapping_sub(c.rotate_left(11));
    b ^= a;
    b = b.wrapping_sub(a.rotate_left(25));
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(16));
    a ^= c;
    a = a.wrapping_sub(c.rotate_left(4));
    b ^= a;
    b = b.wrapping_sub(a.rotate_left(14));
    c ^= b;
    c = c.wrapping_sub(b.rotate_left(24));
    (a, b, c)
}

/// Compile-time op-code for a method's fully-qualified name.
///
/// ```rust
/// use sockrpc::rpc_op_code;
/// let say_hello = rpc_op_code!("hello.HelloService.SayHello");
/// let word_count = rpc_op_code!("taskqueue.WordCountService.WordCount");
/// assert!(say_hello <= u32::MAX as u64);
/// assert_ne!(say_hello, word_count);
/// ```
#[macro_export]
macro_rules! rpc_op_code {
    ($name:literal) => {{
        const CODE: u64 = $crate::opcode::op_code($name);
        CODE
    }};
}
