//! Walks through the main features of `glass-math` and prints the results.
//!
//! Run with `RUST_LOG=glass_math=trace` to see the registry creating types on demand.

use std::f32::consts::FRAC_PI_2;

use anyhow::Context;
use glass_math::*;

fn main() -> anyhow::Result<()> {
    glass_math::init_logger!();

    let sum = (vec3(1.0, 2.0, 3.0) + vec3(4.0, 5.0, 6.0))?;
    log::info!("vec3(1, 2, 3) + vec3(4, 5, 6) = {sum}");

    let half = (ivec2(3, 4) / ivec2(2, 2))?;
    log::info!("ivec2(3, 4) / ivec2(2, 2) = {half} ({})", half.dtype());

    let id = construct!("mat3")?;
    log::info!("mat3() = {id}, [1, 1] = {}, [0, 1] = {}", id[(1, 1)], id[(0, 1)]);

    let v = vec4(1.0, 2.0, 3.0, 4.0);
    log::info!("{v}.zyx = {}", v.attr("zyx")?);

    let a = bvec3(true, false, true);
    let b = bvec3(false, false, true);
    log::info!("{a} == {a}: {}", a == a.clone());
    log::info!("{a} > {b} = {}", a.gt(&b)?);

    let q = Value::from_axis_angle(&vec3(0.0, 0.0, 1.0), FRAC_PI_2)?;
    let rotated = (&q * vec3(1.0, 0.0, 0.0))?;
    log::info!("rotating vec3(1, 0, 0) by {q} = {rotated}");

    let m = Value::from_rows(&[vec3(1.0, 2.0, 3.0), vec3(0.0, 1.0, 4.0), vec3(5.0, 6.0, 0.0)])?;
    let inv = m.inverse().context("matrix should be invertible")?;
    log::info!("det({m}) = {}", m.determinant()?);
    log::info!("inverse = {inv}");
    log::info!("m * inverse = {}", (&m * &inv)?);

    let mut transform = construct!("mat4")?;
    transform.set_observer(|m: &Value| log::debug!("transform changed: {m}"));
    transform.column_mut(3)?.set_attr("xyz", vec3(10.0, 0.0, -5.0))?;
    transform.compound(BinaryOp::Mul, construct!("mat4", 2)?)?;

    log::info!(
        "smoothstep(0, 1, {v}) = {}",
        funcs::smoothstep(0, 1, (&v / 4)?)?
    );

    if let Err(e) = vec2(1.0, 2.0).set_attr("xx", vec2(0.0, 0.0)) {
        log::info!("setting a repeated swizzle fails: {e}");
    }
    if let Err(e) = &construct!("mat2")? * vec3(1.0, 2.0, 3.0) {
        log::info!("non-conformant product fails: {e}");
    }

    log::info!(
        "{} concrete types were created",
        TypeRegistry::global().len()
    );
    Ok(())
}
