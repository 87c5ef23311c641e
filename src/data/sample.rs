use chrono::{Duration, NaiveDate};

use super::loader::REQUIRED_COLUMNS;

const FISH: [(&str, f64); 5] = [
    ("Tilapia", 1800.0),
    ("Catfish", 2200.0),
    ("Mackerel", 2600.0),
    ("Croaker", 3100.0),
    ("Titus", 2900.0),
];
const SIZES: [&str; 3] = ["Small", "Medium", "Large"];
const SUPPLIERS: [&str; 4] = ["Ocean Fresh Ltd", "Lagos Fisheries", "Delta Catch", "Niger Aqua Farms"];
const CUSTOMER_TYPES: [&str; 3] = ["Retail", "Wholesale", "Restaurant"];
const LOCATIONS: [&str; 4] = ["Lagos", "Abuja", "Port Harcourt", "Ibadan"];
const CHANNELS: [&str; 3] = ["In-store", "Online", "Phone Order"];

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A synthetic fish-store CSV with `rows` transactions spread over 2023-2024.
///
/// The same `seed` always yields the same bytes.
pub fn generate_sample_csv(rows: usize, seed: u64) -> Result<String, csv::Error> {
    let mut rng = SimpleRng::new(seed);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REQUIRED_COLUMNS)?;

    let first_day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
    for _ in 0..rows {
        let day = first_day + Duration::days((rng.next_u64() % 730) as i64);
        let restock = day - Duration::days((rng.next_u64() % 14) as i64);

        let &(fish, base_price) = rng.pick(&FISH);
        let quantity = round2(rng.uniform(5.0, 120.0));
        let unit_cost = round2(base_price * rng.uniform(0.55, 0.8));
        let unit_price = round2(base_price * rng.uniform(0.9, 1.25));
        let sales = round2(quantity * unit_price);
        let supply = round2(quantity * unit_cost);

        let date = day.format("%Y-%m-%d").to_string();
        let record = [
            date.clone(),
            date,
            restock.format("%Y-%m-%d").to_string(),
            fish.to_string(),
            rng.pick(&SIZES).to_string(),
            rng.pick(&SUPPLIERS).to_string(),
            rng.pick(&CUSTOMER_TYPES).to_string(),
            rng.pick(&LOCATIONS).to_string(),
            rng.pick(&CHANNELS).to_string(),
            quantity.to_string(),
            sales.to_string(),
            supply.to_string(),
            unit_cost.to_string(),
            unit_price.to_string(),
        ];
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
