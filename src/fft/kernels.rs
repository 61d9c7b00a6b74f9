//! Closed form transforms for 2, 4 and 8 points.

use core::f32::consts::SQRT_2;

pub(super) fn fft_2(buffer: &mut [f32]) {
    let f0r = buffer[0];
    let f0i = buffer[1];
    let f1r = buffer[2];
    let f1i = buffer[3];

    buffer[0] = f0r + f1r;
    buffer[1] = f0i + f1i;
    buffer[2] = f0r - f1r;
    buffer[3] = f0i - f1i;
}

pub(super) fn fft_4(buffer: &mut [f32]) {
    // Loaded in bit reversed order
    let f0r = buffer[0];
    let f0i = buffer[1];
    let mut f1r = buffer[4];
    let mut f1i = buffer[5];
    let mut f2r = buffer[2];
    let mut f2i = buffer[3];
    let f3r = buffer[6];
    let f3i = buffer[7];

    let t0r = f0r + f1r;
    let t0i = f0i + f1i;
    f1r = f0r - f1r;
    f1i = f0i - f1i;

    let t1r = f2r - f3r;
    let t1i = f2i - f3i;
    f2r += f3r;
    f2i += f3i;

    buffer[0] = t0r + f2r;
    buffer[1] = t0i + f2i;
    buffer[4] = t0r - f2r;
    buffer[5] = t0i - f2i;

    buffer[6] = f1r - t1i;
    buffer[7] = f1i + t1r;
    buffer[2] = f1r + t1i;
    buffer[3] = f1i - t1r;
}

pub(super) fn fft_8(buffer: &mut [f32]) {
    let w0r = 1.0 / SQRT_2;

    let mut f0r = buffer[0];
    let mut f0i = buffer[1];
    let mut f1r = buffer[8];
    let mut f1i = buffer[9];
    let mut f2r = buffer[4];
    let mut f2i = buffer[5];
    let mut f3r = buffer[12];
    let mut f3i = buffer[13];
    let mut f4r = buffer[2];
    let mut f4i = buffer[3];
    let mut f5r = buffer[10];
    let mut f5i = buffer[11];
    let mut f6r = buffer[6];
    let mut f6i = buffer[7];
    let mut f7r = buffer[14];
    let mut f7i = buffer[15];

    // 4 point transform of the even samples
    let mut t0r = f0r + f1r;
    let mut t0i = f0i + f1i;
    f1r = f0r - f1r;
    f1i = f0i - f1i;

    let mut t1r = f2r - f3r;
    let mut t1i = f2i - f3i;
    f2r += f3r;
    f2i += f3i;

    f0r = t0r + f2r;
    f0i = t0i + f2i;
    f2r = t0r - f2r;
    f2i = t0i - f2i;

    f3r = f1r - t1i;
    f3i = f1i + t1r;
    f1r += t1i;
    f1i -= t1r;

    // 4 point transform of the odd samples
    t0r = f4r + f5r;
    t0i = f4i + f5i;
    f5r = f4r - f5r;
    f5i = f4i - f5i;

    t1r = f6r - f7r;
    t1i = f6i - f7i;
    f6r += f7r;
    f6i += f7i;

    f4r = t0r + f6r;
    f4i = t0i + f6i;
    f6r = t0r - f6r;
    f6i = t0i - f6i;

    f7r = f5r - t1i;
    f7i = f5i + t1r;
    f5r += t1i;
    f5i -= t1r;

    // Combine
    t0r = f0r - f4r;
    t0i = f0i - f4i;
    f0r += f4r;
    f0i += f4i;

    t1r = f2r - f6i;
    t1i = f2i + f6r;
    f2r += f6i;
    f2i -= f6r;

    f4r = f1r - f5r * w0r - f5i * w0r;
    f4i = f1i + f5r * w0r - f5i * w0r;
    f1r = f1r * 2.0 - f4r;
    f1i = f1i * 2.0 - f4i;

    f6r = f3r + f7r * w0r - f7i * w0r;
    f6i = f3i + f7r * w0r + f7i * w0r;
    f3r = f3r * 2.0 - f6r;
    f3i = f3i * 2.0 - f6i;

    buffer[0] = f0r;
    buffer[1] = f0i;
    buffer[2] = f1r;
    buffer[3] = f1i;
    buffer[4] = f2r;
    buffer[5] = f2i;
    buffer[6] = f3r;
    buffer[7] = f3i;
    buffer[8] = t0r;
    buffer[9] = t0i;
    buffer[10] = f4r;
    buffer[11] = f4i;
    buffer[12] = t1r;
    buffer[13] = t1i;
    buffer[14] = f6r;
    buffer[15] = f6i;
}
