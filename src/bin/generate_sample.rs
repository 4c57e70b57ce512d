use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Blank out a cell now and then so the missing-value report has content.
fn maybe_missing(rng: &mut SimpleRng, p: f64, value: String) -> String {
    if rng.chance(p) {
        String::new()
    } else {
        value
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let regions = ["North", "South", "East", "West"];
    let products = ["Widget", "Gadget", "Gizmo", "Doohickey", "Sprocket"];
    let channels = ["Online", "Retail", "Wholesale"];

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "order_id",
        "region",
        "product",
        "channel",
        "units",
        "unit_price",
        "discount",
        "revenue",
        "returned",
    ])?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for order_id in 1..=500u32 {
        let product_idx = (rng.next_u64() % products.len() as u64) as usize;
        let base_price = 5.0 + 7.5 * product_idx as f64;

        let units = (rng.gauss(20.0, 6.0).round() as i64).max(1);
        // A handful of bulk orders to show up as outliers.
        let units = if rng.chance(0.02) { units * 15 } else { units };
        let unit_price = (rng.gauss(base_price, base_price * 0.1) * 100.0).round() / 100.0;
        let discount = (rng.next_f64() * 0.3 * 100.0).round() / 100.0;
        let revenue = (units as f64 * unit_price * (1.0 - discount) * 100.0).round() / 100.0;

        let region = rng.pick(&regions).to_string();
        let region = maybe_missing(&mut rng, 0.05, region);
        let unit_price = maybe_missing(&mut rng, 0.08, format!("{unit_price:.2}"));

        rows.push(vec![
            order_id.to_string(),
            region,
            products[product_idx].to_string(),
            rng.pick(&channels).to_string(),
            units.to_string(),
            unit_price,
            format!("{discount:.2}"),
            format!("{revenue:.2}"),
            if rng.chance(0.1) { "True" } else { "False" }.to_string(),
        ]);
    }

    // Exact copies of a few orders for the duplicate-row count.
    let duplicates: Vec<Vec<String>> = rows.iter().step_by(100).cloned().collect();
    rows.extend(duplicates);

    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {} rows to {output_path}", rows.len());
    Ok(())
}
