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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let service_types = ["boarding", "day_care", "pet_sitting", "dog_walking"];
    let output_path = "dados_carnaval_2025.csv";

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "id_cliente",
        "tipo_servico",
        "status_conversao_servico",
        "status_conversao_cliente",
        "teve_resposta_formatado",
        "tempo_de_resposta_horas",
        "valor_inicial",
        "quantidade_herois_contatados",
        "dt_checkin",
        "dt_checkout",
    ])?;

    let mut row_count = 0usize;
    for client in 0..120 {
        let client_id = format!("CLI-{client:04}");
        let client_converted = rng.chance(0.55);
        let client_status = if client_converted {
            "Converteu uma das necessidades"
        } else {
            "Não converteu"
        };
        // Client-level attribute, repeated on every service row; a few
        // clients never filled it in.
        let providers = if rng.chance(0.08) {
            String::new()
        } else {
            (1 + rng.next_u64() % 8).to_string()
        };

        let services = 1 + (rng.next_u64() % 3) as usize;
        for _ in 0..services {
            let service_type = *rng.pick(&service_types);
            let had_response = rng.chance(0.85);
            let converted = had_response && rng.chance(if client_converted { 0.6 } else { 0.25 });

            // Short response times dominate; the long tail rarely converts.
            let response_time = if had_response && !rng.chance(0.05) {
                let hours = -(1.0 - rng.next_f64()).ln() * 8.0;
                format!("{hours:.2}")
            } else {
                String::new()
            };
            let initial_value = if rng.chance(0.1) {
                String::new()
            } else {
                format!("{:.2}", 40.0 + rng.next_f64() * 460.0)
            };

            // Check-in inside the Carnaval window, stay of 1-5 days.  A few
            // rows carry the upstream export bug of a literal placeholder.
            let checkin_day = 28 + (rng.next_u64() % 6) as u32;
            let (checkin, checkout) = if rng.chance(0.03) {
                ("sem data".to_string(), String::new())
            } else {
                let (month, day) = if checkin_day > 28 {
                    (3, checkin_day - 28)
                } else {
                    (2, checkin_day)
                };
                let stay = 1 + rng.next_u64() % 5;
                let hour = 8 + rng.next_u64() % 12;
                (
                    format!("2025-{month:02}-{day:02} {hour:02}:00:00"),
                    format!("2025-03-{:02} 11:00:00", day % 25 + stay as u32),
                )
            };

            writer.write_record([
                client_id.as_str(),
                service_type,
                if converted { "Convertido" } else { "Não Convertido" },
                client_status,
                if had_response { "Sim" } else { "Não" },
                response_time.as_str(),
                initial_value.as_str(),
                providers.as_str(),
                checkin.as_str(),
                checkout.as_str(),
            ])?;
            row_count += 1;
        }
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {row_count} service-request rows to {output_path}");
    Ok(())
}
