use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sprig::{BufferConsole, Interpreter, Lexer, Parser};

const PROGRAM: &str = r#"
def primes = [], counts = [:]
for (def n = 2; n < 400; n += 1) {
    def is_prime = 1
    foreach (p in primes) {
        if (n % p == 0) is_prime = 0
    }
    if (is_prime) primes[size(primes)] = n
}
foreach (p in primes) {
    def key = (p % 10) as String
    if (counts[key] == null) counts[key] = 0
    counts[key] += 1
}
println(counts)
"#;

fn lexer_benchmark(c: &mut Criterion) {
    c.bench_function("tokenize prime sieve", |b| {
        b.iter(|| Lexer::new(black_box(PROGRAM)).scan_tokens())
    });
}

fn parser_benchmark(c: &mut Criterion) {
    c.bench_function("parse prime sieve", |b| {
        b.iter(|| Parser::from_source(black_box(PROGRAM)).parse().unwrap())
    });
}

fn execution_benchmark(c: &mut Criterion) {
    let program = Parser::from_source(PROGRAM).parse().unwrap();

    c.bench_function("execute prime sieve", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::new(BufferConsole::new());
            interpreter.run(black_box(&program)).unwrap();
            interpreter.into_console().take_output()
        })
    });
}

criterion_group!(
    benches,
    lexer_benchmark,
    parser_benchmark,
    execution_benchmark
);
criterion_main!(benches);
