use criterion::{black_box, criterion_group, criterion_main, Criterion};

use minjs_par::{ParseSettings, Parser};
use minjs_util::{Document, Handler};

fn synthetic_program(functions: usize) -> String {
    let mut source = String::new();
    for i in 0..functions {
        source.push_str(&format!(
            "function worker{i}(a, b) {{\n  var total = 0;\n  for (var j = 0; j < a.length; j++) {{\n    total += a[j] * b;\n  }}\n  return total > 100 ? total : -total;\n}}\n"
        ));
    }
    source
}

fn bench_parser(c: &mut Criterion) {
    let source = synthetic_program(200);

    c.bench_function("parse_200_functions", |b| {
        b.iter(|| {
            let doc = Document::new("bench.js", source.clone());
            let handler = Handler::new();
            let parser = Parser::new(&doc, &handler, ParseSettings::default());
            let output = parser.parse();
            black_box(output.program.stmts.len())
        })
    });
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
