use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dorm_power_reporter::parsing::{first_number, interpret_status_message};

fn status_message_benchmark(c: &mut Criterion) {
    let test_values = vec![
        "剩余购电量:8.5度",
        "查询成功，剩余购电量:120.25度，请及时缴费",
        "剩余金额:23.40元",
        "用户未登录，请重新登录",
        "Session Timeout",
        "房间信息不存在",
        "",
    ];

    c.bench_function("interpret_status_message", |b| {
        b.iter(|| {
            for value in &test_values {
                let _ = black_box(interpret_status_message(black_box(value)));
            }
        })
    });
}

fn first_number_benchmark(c: &mut Criterion) {
    let test_values = vec!["2.5", "7", "15", "12.30元", "abc", "0.5度"];

    c.bench_function("first_number", |b| {
        b.iter(|| {
            for value in &test_values {
                black_box(first_number(black_box(value)));
            }
        })
    });
}

criterion_group!(benches, status_message_benchmark, first_number_benchmark);
criterion_main!(benches);
