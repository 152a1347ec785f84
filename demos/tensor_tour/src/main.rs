// Tensor tour: walks through the metrica API on numeric tensors.
//
// Run with:
//   cargo run -p tensor_tour
//   RUST_LOG=debug cargo run -p tensor_tour   (shows metric attachment logs)

use metrica::prelude::*;

fn section(title: &str) {
    println!();
    println!("=== {} ===", title);
}

fn minkowski(n: usize) -> Tensor<f64> {
    let mut g = Tensor::<f64>::eye(n);
    for i in 1..n {
        g[[i, i]] = -1.0;
    }
    g
}

fn main() -> metrica::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    log::info!("starting tensor tour");

    section("Construction and access");
    let mut t = Tensor::<f64>::new((3, 3));
    let mut v = 1.0;
    for i in 0..3 {
        for j in 0..3 {
            t[[i, j]] = v;
            v += 1.0;
        }
    }
    println!("{:#}", t);
    println!("t[1, 2] = {}", t.get(&[1, 2])?);
    println!("sum = {}", t.sum());
    if let Err(e) = t.get(&[3, 0]) {
        println!("t[3, 0] -> {}", e);
    }

    section("Elementwise arithmetic");
    let ones = Tensor::full((3, 3), 1.0);
    println!("t + 1:\n{}", t.add(&ones)?);
    println!("t o t:\n{}", t.mul_elementwise(&t)?);
    println!("2.5 * t:\n{:.1}", 2.5f64 * &t);
    if let Err(e) = t.add(&Tensor::new((3, 1))) {
        println!("t + [3x1] -> {}", e);
    }

    section("Reshape and slice");
    let mut flat = t.clone();
    flat.reshape((1, 9))?;
    println!("reshaped to 1x9:\n{}", flat);
    println!("columns 3..6:\n{}", flat.slice(&[(1, 3, 6)])?);
    println!("rows 0..2 of t:\n{}", t.slice(&[(0, 0, 2)])?);

    section("Pseudo-norm");
    let v = Tensor::from_vec(vec![1.0, 2.0, 3.0], 3)?;
    println!("|v|^2 (euclidean) = {}", v.pseudo_norm()?);
    let v = v.with_metric(minkowski(3))?;
    println!("|v|^2 (minkowski) = {}", v.pseudo_norm()?);

    section("Rank 3");
    let cube = Tensor::from_vec((1..=27).map(|v| v as f64).collect(), (3, 3, 3))?;
    println!("{:#}", cube);
    println!("sum = {}", cube.sum());

    section("Kronecker product");
    let a = Tensor::from_vec(vec![1, 2, 3, 4], (2, 2))?;
    let b = Tensor::from_vec(vec![5, 6, 3, 7, 8, 9], (2, 3))?;
    println!("{:#}", a.tensor_product(&b));
    println!("3 * a:\n{}", 3i32 * &a);

    section("Permute");
    let p = cube.permute(&[2, 0, 1])?;
    println!("shape {} -> {}", cube.shape(), p.shape());
    println!("cube[0, 1, 2] = {}, permuted[2, 0, 1] = {}", cube[[0, 1, 2]], p[[2, 0, 1]]);

    section("Contractions");
    println!("trace(t) = {}", t.contract(0, 1)?);
    let tm = t.clone().with_metric(minkowski(3))?;
    println!("metric trace(t) = {}", tm.contract_with_metric(0, 1)?);
    println!("cube contracted over axes 0, 2:\n{}", cube.contract(0, 2)?);

    let m = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (2, 3))?;
    let n = Tensor::from_vec(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], (3, 2))?;
    println!("matrix product:\n{}", m.contract_with(&n, 1, 0)?);

    let u = Tensor::from_vec(vec![1.0, 2.0, 3.0], 3)?;
    println!("u . u = {}", u.contract_with(&u, 0, 0)?);
    let u_m = u.clone().with_metric(minkowski(3))?;
    println!("u . u (minkowski) = {}", u_m.contract_with(&u, 0, 0)?);

    section("Entry dump");
    print!("{}", Tensor::from_vec(vec![1, 2, 3, 4], (2, 2))?.describe()?);

    log::info!("tour finished");
    Ok(())
}
