//! Lexer benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use coltc_lex::{Lexer, Token};
use coltc_util::Handler;

fn sample_program() -> String {
    let mut source = String::new();
    for i in 0..100 {
        source.push_str(&format!(
            "fn compute_{i}(i64 a, i64 b) -> i64 {{\n  var tmp: i64 = a * {i} + b;\n  return tmp % 97;\n}}\n"
        ));
    }
    source
}

fn bench_lex_program(c: &mut Criterion) {
    let source = sample_program();
    c.bench_function("lex_program", |b| {
        b.iter(|| {
            let handler = Handler::new();
            let mut lexer = Lexer::new(black_box(&source), &handler);
            let mut count = 0usize;
            while lexer.next_token() != Token::Eof {
                count += 1;
            }
            black_box(count)
        })
    });
}

fn bench_lex_numbers(c: &mut Criterion) {
    let source = "0xDEAD 0b1010 0o777 123i8 456u32 3.25f 2.5e-3 99999u64 ".repeat(64);
    c.bench_function("lex_numbers", |b| {
        b.iter(|| {
            let handler = Handler::new();
            let mut lexer = Lexer::new(black_box(&source), &handler);
            while lexer.next_token() != Token::Eof {}
        })
    });
}

criterion_group!(benches, bench_lex_program, bench_lex_numbers);
criterion_main!(benches);
