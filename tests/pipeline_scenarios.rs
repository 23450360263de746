//! End-to-end shading through `LinearBitmapPipeline`.

use rastkit::{
    AlphaType, Color4f, ColorType, FilterQuality, GammaType, ImageInfo, LinearBitmapPipeline,
    PipelineError, PipelineOptions, Pixmap, TileMode, TransAffine, Unsupported,
};

/// 2x2 source: red, green / blue, white.
const QUAD: [u8; 16] = [
    255, 0, 0, 255, 0, 255, 0, 255, //
    0, 0, 255, 255, 255, 255, 255, 255,
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn quad() -> Pixmap<'static> {
    Pixmap::new_packed(ImageInfo::rgba8888(2, 2), &QUAD).unwrap()
}

fn pipeline<'a>(
    src: &Pixmap<'a>,
    inverse: TransAffine,
    filter: FilterQuality,
    tile_x: TileMode,
    tile_y: TileMode,
) -> LinearBitmapPipeline<'a> {
    LinearBitmapPipeline::new(&inverse, filter, tile_x, tile_y, src).unwrap()
}

fn shade(p: &LinearBitmapPipeline<'_>, x: i32, y: i32, n: usize) -> Vec<Color4f> {
    let mut dst = vec![Color4f::new(-1.0, -1.0, -1.0, -1.0); n];
    p.shade_span_4f(x, y, &mut dst);
    dst
}

/// Shade the same pixels one at a time.
fn shade_pointwise(p: &LinearBitmapPipeline<'_>, x: i32, y: i32, n: usize) -> Vec<Color4f> {
    (0..n as i32).map(|i| shade(p, x + i, y, 1)[0]).collect()
}

#[test]
fn identity_clamp_returns_source_pixels() {
    init_tracing();
    let src = quad();
    let p = pipeline(
        &src,
        TransAffine::new(),
        FilterQuality::None,
        TileMode::Clamp,
        TileMode::Clamp,
    );
    assert_eq!(shade(&p, 0, 0, 1), vec![Color4f::RED]);
    assert_eq!(shade(&p, 1, 0, 1), vec![Color4f::GREEN]);
    assert_eq!(shade(&p, 0, 1, 1), vec![Color4f::BLUE]);
    assert_eq!(shade(&p, 1, 1, 1), vec![Color4f::WHITE]);
}

#[test]
fn repeat_one_tile_over_matches_origin() {
    init_tracing();
    let src = quad();
    let p = pipeline(
        &src,
        TransAffine::new(),
        FilterQuality::None,
        TileMode::Repeat,
        TileMode::Repeat,
    );
    assert_eq!(shade(&p, 2, 0, 1), shade(&p, 0, 0, 1));
    assert_eq!(shade(&p, 2, 0, 1), vec![Color4f::RED]);
}

#[test]
fn spans_match_single_pixels() {
    init_tracing();
    let src = quad();
    let matrices = [
        TransAffine::new(),
        TransAffine::new_translation(-3.0, 0.5),
        TransAffine::new_scaling(0.25, 0.5),
        TransAffine::new_scaling(-0.75, 1.0),
        TransAffine::new_scaling(3.0, 1.0),
        TransAffine::new_rotation(0.4),
    ];
    let modes = [TileMode::Clamp, TileMode::Repeat, TileMode::Mirror];
    for m in matrices {
        for tile_x in modes {
            for tile_y in modes {
                let p = pipeline(&src, m, FilterQuality::None, tile_x, tile_y);
                for y in -2..3 {
                    let span = shade(&p, -5, y, 13);
                    let points = shade_pointwise(&p, -5, y, 13);
                    assert_eq!(span, points, "{:?} {:?}/{:?} row {}", m, tile_x, tile_y, y);
                }
            }
        }
    }
}

#[test]
fn bilinear_constant_source_is_exact() {
    init_tracing();
    let data = [10u8, 90, 170, 255].repeat(16);
    let src = Pixmap::new_packed(ImageInfo::rgba8888(4, 4), &data).unwrap();
    let expected = Color4f::new(10.0 / 255.0, 90.0 / 255.0, 170.0 / 255.0, 1.0);
    let modes = [TileMode::Clamp, TileMode::Repeat, TileMode::Mirror];
    for tile in modes {
        let p = pipeline(
            &src,
            TransAffine::new_rotation(0.7) * TransAffine::new_translation(1.25, 0.5),
            FilterQuality::Low,
            tile,
            tile,
        );
        for c in shade(&p, -3, 1, 12) {
            assert!(c.approx_eq(&expected, 1e-6), "{:?}: {:?}", tile, c);
        }
    }
}

/// Bilinear lookup done the long way: tile the sample point into the
/// source, then interpolate its two neighbours with the edge rule of the
/// tile mode.
fn tiled_lerp(levels: &[u8], mode: TileMode, x: f64) -> f64 {
    let w = levels.len() as f64;
    let n = levels.len() as i64;
    let x = match mode {
        TileMode::Clamp => x.clamp(0.0, w),
        TileMode::Repeat => x.rem_euclid(w),
        TileMode::Mirror => {
            let m = x.rem_euclid(2.0 * w);
            if m > w {
                2.0 * w - m
            } else {
                m
            }
        }
    };
    let edge = |i: i64| -> f64 {
        let i = match mode {
            TileMode::Clamp => i.clamp(0, n - 1),
            TileMode::Repeat => i.rem_euclid(n),
            TileMode::Mirror if i < 0 => -i - 1,
            TileMode::Mirror if i >= n => 2 * n - 1 - i,
            TileMode::Mirror => i,
        };
        levels[i as usize] as f64 / 255.0
    };
    let left = (x - 0.5).floor();
    let t = x - 0.5 - left;
    edge(left as i64) * (1.0 - t) + edge(left as i64 + 1) * t
}

#[test]
fn bilinear_ramp_matches_reference_across_seams() {
    init_tracing();
    let levels = [0u8, 60, 120, 180, 250];
    let info = ImageInfo::new(5, 1, ColorType::Gray8, AlphaType::Opaque, GammaType::Linear);
    let src = Pixmap::new_packed(info, &levels).unwrap();
    let modes = [TileMode::Clamp, TileMode::Repeat, TileMode::Mirror];
    for mode in modes {
        for step in -96..96 {
            let tx = step as f32 * 0.125 + 0.0625;
            let p = pipeline(
                &src,
                TransAffine::new_translation(tx, 0.0),
                FilterQuality::Low,
                mode,
                TileMode::Clamp,
            );
            let out = shade(&p, -6, 0, 24);
            for (i, c) in out.iter().enumerate() {
                let x = -6.0 + i as f64 + 0.5 + tx as f64;
                let want = tiled_lerp(&levels, mode, x);
                assert!(
                    (c.r as f64 - want).abs() < 1e-4,
                    "{:?} at x = {}: got {}, want {}",
                    mode,
                    x,
                    c.r,
                    want
                );
            }
        }
    }
}

#[test]
fn unpremultiplied_alpha_passes_through_bit_exact() {
    init_tracing();
    let data = [200u8, 100, 50, 77, 20, 40, 60, 201];
    let info = ImageInfo::new(2, 1, ColorType::Bgra8888, AlphaType::Unpremul, GammaType::Linear);
    let src = Pixmap::new_packed(info, &data).unwrap();
    let p = pipeline(
        &src,
        TransAffine::new(),
        FilterQuality::None,
        TileMode::Repeat,
        TileMode::Clamp,
    );
    let out = shade(&p, 0, 0, 4);
    for (i, c) in out.iter().enumerate() {
        let px = &data[(i % 2) * 4..(i % 2) * 4 + 4];
        let a = px[3] as f32 / 255.0;
        assert_eq!(c.a.to_bits(), a.to_bits());
        assert_eq!(c.r, (px[2] as f32 / 255.0) * a);
        assert_eq!(c.b, (px[0] as f32 / 255.0) * a);
    }
}

#[test]
fn unsupported_configurations_are_named() {
    init_tracing();
    let src = quad();
    let persp = TransAffine::new().with_perspective(0.001, 0.0, 1.0);
    let err = LinearBitmapPipeline::with_options(&persp, &PipelineOptions::default(), &src)
        .unwrap_err();
    assert_eq!(err.unsupported(), Some(Unsupported::Perspective));
    assert!(err.to_string().contains("perspective"));

    let bytes = [0u8; 4];
    let unknown = ImageInfo::new(1, 1, ColorType::Unknown, AlphaType::Premul, GammaType::Linear);
    let src = Pixmap::new(unknown, &bytes, 0).unwrap();
    let err = LinearBitmapPipeline::with_options(&TransAffine::new(), &PipelineOptions::default(), &src)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Unsupported(Unsupported::PixelFormat {
            color_type: ColorType::Unknown,
            ..
        })
    ));
}

#[test]
fn srgb_output_roundtrips_source_bytes() {
    init_tracing();
    let data: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v, 255]).collect();
    let info = ImageInfo::new(256, 1, ColorType::Rgba8888, AlphaType::Opaque, GammaType::Srgb);
    let src = Pixmap::new_packed(info, &data).unwrap();
    let p = pipeline(
        &src,
        TransAffine::new(),
        FilterQuality::None,
        TileMode::Clamp,
        TileMode::Clamp,
    );
    for (i, c) in shade(&p, 0, 0, 256).iter().enumerate() {
        let [r, _, _, a] = c.to_srgb8();
        assert!((r as i32 - i as i32).abs() <= 1, "byte {} came back as {}", i, r);
        assert_eq!(a, 255);
    }
}
