//! Collision-free pairing of integer coordinates into a single id
//!
//! Signed components are zig-zag encoded onto `u32` and combined with
//! Szudzik's elegant pairing, which is a bijection `u32 x u32 -> u64`.

/// Map a signed value onto the naturals: 0, -1, 1, -2, 2 ... -> 0, 1, 2, 3, 4 ...
pub const fn zigzag(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag`]
pub const fn unzigzag(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Szudzik pairing of two naturals
pub const fn szudzik(a: u32, b: u32) -> u64 {
    let a = a as u64;
    let b = b as u64;
    if a >= b { a * a + a + b } else { b * b + a }
}

/// Inverse of [`szudzik`]
pub fn unszudzik(z: u64) -> (u32, u32) {
    let root = z.isqrt();
    let rem = z - root * root;
    if rem < root {
        (rem as u32, root as u32)
    } else {
        (root as u32, (rem - root) as u32)
    }
}

/// Pair a signed coordinate into a unique id
pub const fn pair(x: i32, y: i32) -> u64 {
    szudzik(zigzag(x), zigzag(y))
}

/// Recover the coordinate from an id produced by [`pair`]
pub fn unpair(id: u64) -> (i32, i32) {
    let (a, b) = unszudzik(id);
    (unzigzag(a), unzigzag(b))
}
