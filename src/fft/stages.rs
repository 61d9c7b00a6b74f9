//! Butterfly passes of the split radix 2/4/8 transform.
//!
//! Buffers are interleaved complex values, so a "position" below is an
//! index into the flat `f32` slice and is always even. Twiddle factors are
//! read from a quarter-period cosine table; `twiddle_stride` lets a plan
//! built for 2^m points drive a 2^(m - 1) point transform by skipping every
//! other table entry.

use core::f32::consts::SQRT_2;

use super::kernels;

#[inline]
fn pow2(exponent: u32) -> usize {
    1 << exponent
}

/// Runs a complete in-place forward transform of 2^`exponent` points.
pub(super) fn transform(
    buffer: &mut [f32],
    exponent: u32,
    cosine_table: &[f32],
    twiddle_stride: usize,
    bit_reverse: &[usize],
    cache_exponent: u32,
) {
    match exponent {
        0 => {}
        1 => kernels::fft_2(buffer),
        2 => kernels::fft_4(buffer),
        3 => kernels::fft_8(buffer),
        _ => {
            bit_reverse_radix2(buffer, exponent, bit_reverse);
            let stage_count = (exponent - 1) / 3;
            let mut twiddle_groups = 2;
            match exponent - 1 - 3 * stage_count {
                1 => {
                    radix2_pass(buffer, exponent, twiddle_groups);
                    twiddle_groups *= 2;
                }
                2 => {
                    radix4_pass(buffer, exponent, twiddle_groups);
                    twiddle_groups *= 4;
                }
                _ => {}
            }
            radix8_recursive(
                buffer,
                0,
                exponent,
                cosine_table,
                twiddle_stride,
                twiddle_groups,
                stage_count,
                cache_exponent,
            );
        }
    }
}

/// Splits transforms that don't fit in cache into eight interleaved sub
/// transforms, finishing with a single radix 8 stage over the whole block.
#[allow(clippy::too_many_arguments)]
fn radix8_recursive(
    buffer: &mut [f32],
    base: usize,
    exponent: u32,
    cosine_table: &[f32],
    twiddle_stride: usize,
    twiddle_groups: usize,
    stage_count: u32,
    cache_exponent: u32,
) {
    if exponent <= cache_exponent {
        radix8_stages(
            buffer,
            base,
            exponent,
            cosine_table,
            twiddle_stride,
            twiddle_groups,
            stage_count,
        );
    } else {
        let block = pow2(exponent - 3) * 2;
        for i in 0..8 {
            radix8_recursive(
                buffer,
                base + i * block,
                exponent - 3,
                cosine_table,
                twiddle_stride * 8,
                twiddle_groups,
                stage_count - 1,
                cache_exponent,
            );
        }
        radix8_stages(
            buffer,
            base,
            exponent,
            cosine_table,
            twiddle_stride,
            pow2(exponent - 3),
            1,
        );
    }
}

/// Bit reverses the buffer in place while doing the first radix 2 pass.
pub(super) fn bit_reverse_radix2(buffer: &mut [f32], exponent: u32, bit_reverse: &[usize]) {
    let row_step = pow2((exponent + 3) / 2);
    let column_increment = pow2(exponent) - row_step;
    let last_column = pow2(exponent / 2 - 1) - 1;
    let column_shift = (exponent + 1) / 2 + 1;
    let pos_a = pow2(exponent);
    let pos_b = pos_a + 2;

    let mut block = 0;
    while block < row_step {
        for column_start in (0..=last_column).rev() {
            let mut column = last_column;
            let row = block + (column_start << column_shift);
            let mut p0 = block + column_increment + bit_reverse[column_start] * 4;
            let mut p1 = row + bit_reverse[column] * 4;

            let mut f0r = buffer[p0];
            let mut f0i = buffer[p0 + 1];
            let mut f1r = buffer[p0 + pos_a];
            let mut f1i = buffer[p0 + pos_a + 1];
            while column > column_start {
                let f2r = buffer[p0 + 2];
                let f2i = buffer[p0 + 3];
                let f3r = buffer[p0 + pos_b];
                let f3i = buffer[p0 + pos_b + 1];
                let f4r = buffer[p1];
                let f4i = buffer[p1 + 1];
                let f5r = buffer[p1 + pos_a];
                let f5i = buffer[p1 + pos_a + 1];
                let f6r = buffer[p1 + 2];
                let f6i = buffer[p1 + 3];
                let f7r = buffer[p1 + pos_b];
                let f7i = buffer[p1 + pos_b + 1];

                // Swap the two groups, doing a 2 point transform on each
                buffer[p1] = f0r + f1r;
                buffer[p1 + 1] = f0i + f1i;
                buffer[p1 + 2] = f0r - f1r;
                buffer[p1 + 3] = f0i - f1i;
                buffer[p1 + pos_a] = f2r + f3r;
                buffer[p1 + pos_a + 1] = f2i + f3i;
                buffer[p1 + pos_b] = f2r - f3r;
                buffer[p1 + pos_b + 1] = f2i - f3i;

                buffer[p0] = f4r + f5r;
                buffer[p0 + 1] = f4i + f5i;
                buffer[p0 + 2] = f4r - f5r;
                buffer[p0 + 3] = f4i - f5i;
                buffer[p0 + pos_a] = f6r + f7r;
                buffer[p0 + pos_a + 1] = f6i + f7i;
                buffer[p0 + pos_b] = f6r - f7r;
                buffer[p0 + pos_b + 1] = f6i - f7i;

                p0 -= row_step;
                f0r = buffer[p0];
                f0i = buffer[p0 + 1];
                f1r = buffer[p0 + pos_a];
                f1i = buffer[p0 + pos_a + 1];
                column -= 1;
                p1 = row + bit_reverse[column] * 4;
            }

            // Diagonal element, transformed in place
            let f2r = buffer[p0 + 2];
            let f2i = buffer[p0 + 3];
            let f3r = buffer[p0 + pos_b];
            let f3i = buffer[p0 + pos_b + 1];

            buffer[p0] = f0r + f1r;
            buffer[p0 + 1] = f0i + f1i;
            buffer[p0 + 2] = f0r - f1r;
            buffer[p0 + 3] = f0i - f1i;
            buffer[p0 + pos_a] = f2r + f3r;
            buffer[p0 + pos_a + 1] = f2i + f3i;
            buffer[p0 + pos_b] = f2r - f3r;
            buffer[p0 + pos_b + 1] = f2i - f3i;
        }
        block += pow2(exponent / 2 + 1);
    }
}

/// Radix 2 pass, used when the stage count leaves one extra bit.
pub(super) fn radix2_pass(buffer: &mut [f32], exponent: u32, twiddle_groups: usize) {
    let stride = twiddle_groups * 2;
    let group_step = stride * 4;
    let group_count = pow2(exponent) / 4 / twiddle_groups;

    let mut p0 = 0;
    for _ in 0..group_count {
        let p1 = p0 + stride;
        let p2 = p1 + stride;
        let p3 = p2 + stride;

        let f0r = buffer[p0];
        let f0i = buffer[p0 + 1];
        let f1r = buffer[p1];
        let f1i = buffer[p1 + 1];
        let f2r = buffer[p2];
        let f2i = buffer[p2 + 1];
        let f3r = buffer[p3];
        let f3i = buffer[p3 + 1];

        buffer[p0] = f0r + f1r;
        buffer[p0 + 1] = f0i + f1i;
        buffer[p1] = f0r - f1r;
        buffer[p1 + 1] = f0i - f1i;
        buffer[p2] = f2r + f3r;
        buffer[p2 + 1] = f2i + f3i;
        buffer[p3] = f2r - f3r;
        buffer[p3 + 1] = f2i - f3i;

        // Second value of each pair takes the -j twiddle
        let f0r = buffer[p0 + 2];
        let f0i = buffer[p0 + 3];
        let f1r = buffer[p1 + 2];
        let f1i = buffer[p1 + 3];
        let f2r = buffer[p2 + 2];
        let f2i = buffer[p2 + 3];
        let f3r = buffer[p3 + 2];
        let f3i = buffer[p3 + 3];

        buffer[p0 + 2] = f0r + f1i;
        buffer[p0 + 3] = f0i - f1r;
        buffer[p1 + 2] = f0r - f1i;
        buffer[p1 + 3] = f0i + f1r;
        buffer[p2 + 2] = f2r + f3i;
        buffer[p2 + 3] = f2i - f3r;
        buffer[p3 + 2] = f2r - f3i;
        buffer[p3 + 3] = f2i + f3r;

        p0 += group_step;
    }
}

/// Radix 4 pass, used when the stage count leaves two extra bits.
pub(super) fn radix4_pass(buffer: &mut [f32], exponent: u32, twiddle_groups: usize) {
    let w1r = 1.0 / SQRT_2;
    let stride = twiddle_groups * 2;
    let group_step = stride * 4;
    let pos = 2;
    let group_count = pow2(exponent) / 4 / twiddle_groups;

    let mut p0 = 0;
    for _ in 0..group_count {
        let p1 = p0 + stride;
        let p2 = p1 + stride;
        let p3 = p2 + stride;

        let f0r = buffer[p0];
        let f0i = buffer[p0 + 1];
        let f1r = buffer[p1];
        let f1i = buffer[p1 + 1];
        let f2r = buffer[p2];
        let f2i = buffer[p2 + 1];
        let f3r = buffer[p3];
        let f3i = buffer[p3 + 1];

        let f5r = f0r - f1r;
        let f5i = f0i - f1i;
        let f0r = f0r + f1r;
        let f0i = f0i + f1i;
        let f6r = f2r + f3r;
        let f6i = f2i + f3i;
        let f3r = f2r - f3r;
        let f3i = f2i - f3i;

        let f7r = f5r - f3i;
        let f7i = f5i + f3r;
        let f5r = f5r + f3i;
        let f5i = f5i - f3r;
        let f4r = f0r + f6r;
        let f4i = f0i + f6i;
        let f6r = f0r - f6r;
        let f6i = f0i - f6i;

        buffer[p0] = f4r;
        buffer[p0 + 1] = f4i;
        buffer[p1] = f5r;
        buffer[p1 + 1] = f5i;
        buffer[p2] = f6r;
        buffer[p2 + 1] = f6i;
        buffer[p3] = f7r;
        buffer[p3 + 1] = f7i;

        // Second value of each group, with the eighth-turn twiddles
        let f0r = buffer[p0 + pos];
        let f0i = buffer[p0 + pos + 1];
        let f1r = buffer[p1 + pos];
        let f1i = buffer[p1 + pos + 1];
        let f2r = buffer[p2 + pos];
        let f2i = buffer[p2 + pos + 1];
        let f3r = buffer[p3 + pos];
        let f3i = buffer[p3 + pos + 1];

        let f7r = f2r - f3i;
        let f7i = f2i + f3r;
        let f2r = f2r + f3i;
        let f2i = f2i - f3r;

        let f4r = f0r + f1i;
        let f4i = f0i - f1r;
        let t1r = f0r - f1i;
        let t1i = f0i + f1r;

        let f5r = t1r - f7r * w1r + f7i * w1r;
        let f5i = t1i - f7r * w1r - f7i * w1r;
        let f7r = t1r * 2.0 - f5r;
        let f7i = t1i * 2.0 - f5i;

        let f6r = f4r - f2r * w1r - f2i * w1r;
        let f6i = f4i + f2r * w1r - f2i * w1r;
        let f4r = f4r * 2.0 - f6r;
        let f4i = f4i * 2.0 - f6i;

        buffer[p0 + pos] = f4r;
        buffer[p0 + pos + 1] = f4i;
        buffer[p1 + pos] = f5r;
        buffer[p1 + pos + 1] = f5i;
        buffer[p2 + pos] = f6r;
        buffer[p2 + pos + 1] = f6i;
        buffer[p3 + pos] = f7r;
        buffer[p3 + pos + 1] = f7i;

        p0 += group_step;
    }
}

#[derive(Clone, Copy)]
struct Twiddles {
    w0r: f32,
    w0i: f32,
    w1r: f32,
    w1i: f32,
    w2r: f32,
    w2i: f32,
    w3r: f32,
    w3i: f32,
}

/// Runs `stage_count` radix 8 stages over the block of 2^`exponent` points at
/// `base`. `twiddle_groups` is the number of distinct twiddle sets in the
/// first of these stages; it grows eightfold per stage.
pub(super) fn radix8_stages(
    buffer: &mut [f32],
    base: usize,
    exponent: u32,
    cosine_table: &[f32],
    twiddle_stride: usize,
    twiddle_groups: usize,
    stage_count: u32,
) {
    let size = pow2(exponent);
    let stride_u = twiddle_stride as isize;
    let u2_to_u3 = ((size / 8) * twiddle_stride) as isize;
    let quarter = (pow2(exponent.saturating_sub(2)) * twiddle_stride) as isize;
    let table = |index: isize| cosine_table[index as usize];

    let mut twiddle_groups = twiddle_groups;
    let mut stride = twiddle_groups * 2;
    let mut group_step = stride * 8;
    let mut pos = stride * 4;
    let mut butterflies = size / 8 / twiddle_groups;
    let mut u_inc = butterflies as isize * stride_u;
    let mut u_inc2 = u_inc * 2;
    let mut u_inc4 = u_inc * 4;

    for _ in 0..stage_count {
        let (mut u0r, mut u0i) = (0_isize, quarter);
        let (mut u1r, mut u1i) = (0_isize, quarter);
        let (mut u2r, mut u2i) = (0_isize, quarter);

        let mut w = Twiddles {
            w0r: table(u0r),
            w0i: table(u0i),
            w1r: table(u1r),
            w1i: table(u1i),
            w2r: table(u2r),
            w2i: table(u2i),
            w3r: table(u2r + u2_to_u3),
            w3i: table(u2i - u2_to_u3),
        };

        for group in 0..twiddle_groups {
            let start = base + 2 * group;
            for butterfly in 0..butterflies {
                let p0 = start + butterfly * group_step;
                radix8_butterfly(buffer, p0, stride, pos, &w);
            }

            let remaining = twiddle_groups - group;
            if remaining == twiddle_groups / 2 {
                u_inc4 = -u_inc4;
            }
            u0r += u_inc4;
            u0i -= u_inc4;
            u1r += u_inc2;
            u1i -= u_inc2;
            u2r += u_inc;
            u2i -= u_inc;

            if remaining > 1 {
                w.w0r = table(u0r);
                w.w0i = table(u0i);
                if remaining <= twiddle_groups / 2 {
                    w.w0r = -w.w0r;
                }
                w.w1r = table(u1r);
                w.w1i = table(u1i);
                w.w2r = table(u2r);
                w.w2i = table(u2i);
                w.w3r = table(u2r + u2_to_u3);
                w.w3i = table(u2i - u2_to_u3);
            }
        }

        butterflies /= 8;
        u_inc /= 8;
        u_inc2 = u_inc * 2;
        u_inc4 = u_inc * 4;
        twiddle_groups *= 8;
        stride *= 8;
        group_step *= 8;
        pos *= 8;
    }
}

#[inline(always)]
fn radix8_butterfly(buffer: &mut [f32], p0: usize, stride: usize, pos: usize, w: &Twiddles) {
    let p1 = p0 + stride;
    let p2 = p1 + stride;
    let p3 = p2 + stride;

    let f0r = buffer[p0];
    let f0i = buffer[p0 + 1];
    let f1r = buffer[p1];
    let f1i = buffer[p1 + 1];
    let f2r = buffer[p2];
    let f2i = buffer[p2 + 1];
    let f3r = buffer[p3];
    let f3i = buffer[p3 + 1];
    let f4r = buffer[p0 + pos];
    let f4i = buffer[p0 + pos + 1];
    let f5r = buffer[p1 + pos];
    let f5i = buffer[p1 + pos + 1];
    let f6r = buffer[p2 + pos];
    let f6i = buffer[p2 + pos + 1];
    let f7r = buffer[p3 + pos];
    let f7i = buffer[p3 + pos + 1];

    let t0r = f0r + f1r * w.w0r + f1i * w.w0i;
    let t0i = f0i - f1r * w.w0i + f1i * w.w0r;
    let f1r = f0r * 2.0 - t0r;
    let f1i = f0i * 2.0 - t0i;

    let t1r = f2r - f3r * w.w0r - f3i * w.w0i;
    let t1i = f2i + f3r * w.w0i - f3i * w.w0r;
    let f2r = f2r * 2.0 - t1r;
    let f2i = f2i * 2.0 - t1i;

    let f0r = t0r + f2r * w.w1r + f2i * w.w1i;
    let f0i = t0i - f2r * w.w1i + f2i * w.w1r;
    let f2r = t0r * 2.0 - f0r;
    let f2i = t0i * 2.0 - f0i;

    let f3r = f1r + t1r * w.w1i - t1i * w.w1r;
    let f3i = f1i + t1r * w.w1r + t1i * w.w1i;
    let f1r = f1r * 2.0 - f3r;
    let f1i = f1i * 2.0 - f3i;

    let t0r = f4r + f5r * w.w0r + f5i * w.w0i;
    let t0i = f4i - f5r * w.w0i + f5i * w.w0r;
    let f5r = f4r * 2.0 - t0r;
    let f5i = f4i * 2.0 - t0i;

    let t1r = f6r - f7r * w.w0r - f7i * w.w0i;
    let t1i = f6i + f7r * w.w0i - f7i * w.w0r;
    let f6r = f6r * 2.0 - t1r;
    let f6i = f6i * 2.0 - t1i;

    let f4r = t0r + f6r * w.w1r + f6i * w.w1i;
    let f4i = t0i - f6r * w.w1i + f6i * w.w1r;
    let f6r = t0r * 2.0 - f4r;
    let f6i = t0i * 2.0 - f4i;

    let f7r = f5r + t1r * w.w1i - t1i * w.w1r;
    let f7i = f5i + t1r * w.w1r + t1i * w.w1i;
    let f5r = f5r * 2.0 - f7r;
    let f5i = f5i * 2.0 - f7i;

    let t0r = f0r - f4r * w.w2r - f4i * w.w2i;
    let t0i = f0i + f4r * w.w2i - f4i * w.w2r;
    let f0r = f0r * 2.0 - t0r;
    let f0i = f0i * 2.0 - t0i;

    let t1r = f1r - f5r * w.w3r - f5i * w.w3i;
    let t1i = f1i + f5r * w.w3i - f5i * w.w3r;
    let f1r = f1r * 2.0 - t1r;
    let f1i = f1i * 2.0 - t1i;

    buffer[p0 + pos] = t0r;
    buffer[p0 + pos + 1] = t0i;
    buffer[p1 + pos] = t1r;
    buffer[p1 + pos + 1] = t1i;
    buffer[p0] = f0r;
    buffer[p0 + 1] = f0i;
    buffer[p1] = f1r;
    buffer[p1 + 1] = f1i;

    let f4r = f2r - f6r * w.w2i + f6i * w.w2r;
    let f4i = f2i - f6r * w.w2r - f6i * w.w2i;
    let f6r = f2r * 2.0 - f4r;
    let f6i = f2i * 2.0 - f4i;

    let f5r = f3r - f7r * w.w3i + f7i * w.w3r;
    let f5i = f3i - f7r * w.w3r - f7i * w.w3i;
    let f7r = f3r * 2.0 - f5r;
    let f7i = f3i * 2.0 - f5i;

    buffer[p2] = f4r;
    buffer[p2 + 1] = f4i;
    buffer[p3] = f5r;
    buffer[p3 + 1] = f5i;
    buffer[p2 + pos] = f6r;
    buffer[p2 + pos + 1] = f6i;
    buffer[p3 + pos] = f7r;
    buffer[p3 + pos + 1] = f7i;
}
