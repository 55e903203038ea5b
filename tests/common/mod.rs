use qrgrid_wasm::qr;
use qrgrid_wasm::qrencode::QrCode;


//  ************************************************************
//  Structural checks shared by the integration tests
//
//  Without a decoder in scope, conformance is checked structurally:
//  the function patterns, the dark module, and both copies of the
//  format (and version) information must be in place for any
//  correctly encoded symbol
//  ************************************************************

pub fn verify_structure(code: &QrCode) {
    let n = code.size();
    assert_eq!(n, 4 * code.version() as usize + 17, "wrong symbol size for version {}", code.version());
    assert!(code.mask() <= 7, "mask {} out of range", code.mask());

    verify_finder(code, 3, 3);
    verify_finder(code, n - 4, 3);
    verify_finder(code, 3, n - 4);

    // Timing patterns alternate over the full width and height;
    // alignment patterns are centered on even coordinates and agree with them
    for i in 0..n {
        assert_eq!(code.get_module(i as i32, 6), i % 2 == 0, "timing row wrong at x={}", i);
        assert_eq!(code.get_module(6, i as i32), i % 2 == 0, "timing column wrong at y={}", i);
    }

    assert!(code.get_module(8, (n - 8) as i32), "dark module is light");

    verify_format_info(code);
    if code.version() >= 7 {
        verify_version_info(code);
    }
}


//  ************************************************************

fn verify_finder(code: &QrCode, x: usize, y: usize) {
    let n = code.size() as i32;
    for dy in -4i32..=4 {
        for dx in -4i32..=4 {
            let xx = x as i32 + dx;
            let yy = y as i32 + dy;
            if xx < 0 || yy < 0 || xx >= n || yy >= n {
                continue;
            }
            let dist = if dx.abs() > dy.abs() { dx.abs() } else { dy.abs() };
            assert_eq!(
                code.get_module(xx, yy),
                dist != 2 && dist != 4,
                "finder centered on ({},{}) wrong at ({},{})\n{}",
                x,
                y,
                xx,
                yy,
                matrix_to_string(code)
            );
        }
    }
}


//  ************************************************************

fn verify_format_info(code: &QrCode) {
    let expected = qr::format_info(code.mask(), code.ec());
    let n = code.size() as i32;

    let mut primary: u16 = 0;
    for i in 0..6usize {
        if code.get_module(8, i as i32) {
            primary |= 1 << i;
        }
    }
    if code.get_module(8, 7) {
        primary |= 1 << 6;
    }
    if code.get_module(8, 8) {
        primary |= 1 << 7;
    }
    if code.get_module(7, 8) {
        primary |= 1 << 8;
    }
    for i in 9..15usize {
        if code.get_module(14 - i as i32, 8) {
            primary |= 1 << i;
        }
    }
    assert_eq!(primary, expected, "primary format info wrong (mask={} ec={:?})", code.mask(), code.ec());

    let mut secondary: u16 = 0;
    for i in 0..8usize {
        if code.get_module(n - 1 - i as i32, 8) {
            secondary |= 1 << i;
        }
    }
    for i in 8..15usize {
        if code.get_module(8, n - 15 + i as i32) {
            secondary |= 1 << i;
        }
    }
    assert_eq!(secondary, expected, "secondary format info wrong (mask={} ec={:?})", code.mask(), code.ec());
}


//  ************************************************************

fn verify_version_info(code: &QrCode) {
    let expected = qr::version_info(code.version());
    let n = code.size() as i32;
    let mut top_right: u32 = 0;
    let mut bottom_left: u32 = 0;
    for i in 0..18usize {
        let a = n - 11 + (i % 3) as i32;
        let b = (i / 3) as i32;
        if code.get_module(a, b) {
            top_right |= 1 << i;
        }
        if code.get_module(b, a) {
            bottom_left |= 1 << i;
        }
    }
    assert_eq!(top_right, expected, "top right version info wrong for version {}", code.version());
    assert_eq!(bottom_left, expected, "bottom left version info wrong for version {}", code.version());
}


//  ************************************************************

pub fn matrix_to_string(code: &QrCode) -> String {
    let n = code.size() as i32;
    let mut s = String::with_capacity((code.size() + 1) * code.size());
    for y in 0..n {
        for x in 0..n {
            s.push(if code.get_module(x, y) { '@' } else { '.' });
        }
        s.push('\n');
    }
    s
}
