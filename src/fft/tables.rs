use alloc::{boxed::Box, vec::Vec};

/// Computes the quarter-period cosine table used for the twiddle factors of a
/// transform of size 2^`exponent`. The table has 2^`exponent` / 4 + 1 entries,
/// entry `i` being `cos(2 pi i / 2^exponent)`. The end points are exact.
pub fn cosine_table(exponent: u32) -> Box<[f32]> {
    let size = 1_usize << exponent;
    let quarter = size / 4;
    (0..=quarter)
        .map(|i| {
            if i == 0 {
                1.0
            } else if i == quarter {
                0.0
            } else {
                libm::cos(2.0 * core::f64::consts::PI * (i as f64) / (size as f64)) as f32
            }
        })
        .collect::<Vec<f32>>()
        .into_boxed_slice()
}

/// Computes the bit reversal table driving the combined bit reversal and
/// first radix 2 pass of a transform of size 2^`exponent`.
///
/// The table holds 2^(`exponent` / 2 - 1) entries and is empty for exponents
/// below 2, which are handled by the closed form kernels anyway.
pub fn bit_reverse_table(exponent: u32) -> Box<[usize]> {
    if exponent < 2 {
        return Box::new([]);
    }
    let root_exponent = exponent / 2 - 1;
    let root_size = 1_usize << root_exponent;
    (0..root_size)
        .map(|i| {
            (1..=root_exponent)
                .filter(|bit| i & (1 << (bit - 1)) != 0)
                .map(|bit| root_size >> bit)
                .sum()
        })
        .collect::<Vec<usize>>()
        .into_boxed_slice()
}
