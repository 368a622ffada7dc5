//! Encodes the classic "Einstein riddle" (five houses, five nationalities, five pets,
//! five drinks, five cigarette brands, fourteen clues) as a 125-variable DIMACS CNF file,
//! and prints the variable-to-name mapping used by the encoding.
//!
//! `var(attribute, position) = attribute * 5 + position + 1`, where `attribute` ranges
//! over the 25 values below (5 colors, 5 nationalities, 5 pets, 5 drinks, 5 brands) and
//! `position` is the house index `0..5`.

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process;

#[derive(Clone, Copy)]
enum Attribute {
    Red = 0,
    Blue,
    Green,
    Yellow,
    White,
    Brit,
    Swede,
    Dane,
    Norwegian,
    German,
    Dog,
    Bird,
    Cat,
    Horse,
    Fish,
    Tea,
    Coffee,
    Milk,
    Beer,
    Water,
    PallMall,
    Dunhill,
    Blends,
    Bluemasters,
    Prince,
}

const NUM_ATTRIBUTES: i32 = 25;

const ATTRIBUTE_NAMES: [&str; 25] = [
    "Red", "Blue", "Green", "Yellow", "White", "Brit", "Swede", "Dane", "Norwegian", "German",
    "Dog", "Bird", "Cat", "Horse", "Fish", "Tea", "Coffee", "Milk", "Beer", "Water", "PallMall",
    "Dunhill", "Blends", "Bluemasters", "Prince",
];

fn var(attribute: i32, position: i32) -> i32 {
    attribute * 5 + position + 1
}

/// A CNF in progress: one `Vec<i32>` per clause, each literal's sign encoding polarity and
/// terminated implicitly (the DIMACS `0` terminator is emitted at write time).
#[derive(Default)]
struct Encoder {
    clauses: Vec<Vec<i32>>,
}

impl Encoder {
    fn clause(&mut self, literals: Vec<i32>) {
        self.clauses.push(literals);
    }

    /// Neither `a` nor `b` holds at the same house position.
    fn pair(&mut self, a: Attribute, b: Attribute) {
        for i in 0..5 {
            for k in 0..5 {
                if i == k {
                    continue;
                }
                self.clause(vec![-var(a as i32, i), -var(b as i32, k)]);
            }
        }
    }

    /// `a` and `b` are never at adjacent house positions.
    fn next_to(&mut self, a: Attribute, b: Attribute) {
        for i in 0..5 {
            for k in 0..5 {
                if (k - i == 1) || (i - k == 1) {
                    continue;
                }
                self.clause(vec![-var(a as i32, i), -var(b as i32, k)]);
            }
        }
    }

    /// `a` is never one position to the left of `b`.
    fn left_of(&mut self, a: Attribute, b: Attribute) {
        for i in 0..5 {
            for k in 0..5 {
                if i + 1 == k {
                    continue;
                }
                self.clause(vec![-var(a as i32, i), -var(b as i32, k)]);
            }
        }
    }

    fn force_true(&mut self, attribute: Attribute, position: i32) {
        self.clause(vec![var(attribute as i32, position)]);
    }

    fn write(&self, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "c Encoding of Einstein Riddle with 5 Houses")?;
        writeln!(out, "c By Calvin Khiddee-Wu")?;
        writeln!(out, "p cnf 125 {}", self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(out, "{} ", lit)?;
            }
            writeln!(out, "0")?;
        }
        Ok(())
    }
}

fn build() -> Encoder {
    use Attribute::*;

    let mut enc = Encoder::default();

    for attribute in 0..NUM_ATTRIBUTES {
        // Every house has exactly one value of each attribute.
        enc.clause((0..5).map(|position| var(attribute, position)).collect());
        for m in 0..5 {
            for n in (m + 1)..5 {
                enc.clause(vec![-var(attribute, m), -var(attribute, n)]);
            }
        }
    }

    // Every house position has at most one attribute per category (color/nationality/
    // pet/drink/brand).
    for category in 0..5i32 {
        for position in 0..5 {
            for m in 0..5 {
                for n in (m + 1)..5 {
                    enc.clause(vec![
                        -var(category * 5 + m, position),
                        -var(category * 5 + n, position),
                    ]);
                }
            }
        }
    }

    enc.pair(Brit, Red);
    enc.pair(Swede, Dog);
    enc.pair(Dane, Tea);
    enc.left_of(Green, White);
    enc.pair(Green, Coffee);
    enc.pair(PallMall, Bird);
    enc.pair(Yellow, Dunhill);
    enc.force_true(Milk, 2);
    enc.force_true(Norwegian, 0);
    enc.next_to(Blends, Cat);
    enc.next_to(Horse, Dunhill);
    enc.pair(Bluemasters, Beer);
    enc.pair(German, Prince);
    enc.next_to(Norwegian, Blue);
    enc.next_to(Blends, Water);

    enc
}

fn print_name(variable_id: i32) {
    let attribute = (variable_id - 1) / 5;
    let position = (variable_id - 1) % 5;
    println!("x{} = {}{}", variable_id, ATTRIBUTE_NAMES[attribute as usize], position);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("err: expected usage: riddle-encoder <output>.cnf");
        process::exit(1);
    }

    let encoder = build();
    let file = match File::create(&args[1]) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("err: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = encoder.write(file) {
        eprintln!("err: {}", e);
        process::exit(1);
    }

    for variable_id in 1..=125 {
        print_name(variable_id);
    }
}
