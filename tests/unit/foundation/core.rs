use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.as_f64(), 30.0);
    assert!((fps.frames_to_secs(45) - 1.5).abs() < 1e-12);
}

#[test]
fn canvas_to_u16_checks_bounds() {
    let ok = Canvas {
        width: 640,
        height: 400,
    };
    assert_eq!(ok.to_u16().unwrap(), (640, 400));

    let zero = Canvas {
        width: 0,
        height: 400,
    };
    assert!(matches!(zero.to_u16(), Err(ReelError::Surface(_))));

    let huge = Canvas {
        width: 70_000,
        height: 10,
    };
    assert!(matches!(huge.to_u16(), Err(ReelError::Surface(_))));
}

#[test]
fn alpha_mul_scales_only_alpha() {
    let c = Rgba8::rgb(255, 255, 255).with_alpha_mul(0.2);
    assert_eq!(c.to_array(), [255, 255, 255, 51]);
    assert_eq!(c.to_premul_array(), [51, 51, 51, 51]);
}
