use criterion::{black_box, criterion_group, criterion_main, Criterion};
use konkludi::rete::{connect, Node, NodeArena, Rete, Rule, Rules};
use konkludi::{Bindings, RecordType, Scope, Value};
use std::rc::Rc;

fn sensor_type() -> Rc<RecordType> {
    RecordType::new("Sensor", vec!["id"])
}

fn reading_type() -> Rc<RecordType> {
    RecordType::new("Reading", vec!["sensor", "value"])
}

fn alarm_body(node: &Node, item: &Value) {
    let jr = item.as_seq().expect("join result");
    let sensor = jr[0].as_record().unwrap();
    let reading = jr[1].as_record().unwrap();
    if sensor.get("id") != reading.get("sensor") {
        return;
    }
    let ty = RecordType::new("Alarm", vec!["sensor"]);
    node.emit(&ty.make(vec![jr[0].clone()]));
}

fn alarm(rete: &Rete) {
    let p0 = rete.type_test("Sensor");
    let p1 = rete.type_test("Reading");
    let previous = rete.join("alarm-0", p0, p1);
    let rule = rete.function("alarm", alarm_body);
    connect(previous, rule);
    connect(rule, rete.root());
}

fn assert_readings(sensors: usize, readings: usize) -> usize {
    let mut rules = Rules::new();
    rules
        .insert(Rule::new(
            "alarm",
            &["Sensor", "Reading"],
            &["Alarm"],
            alarm,
            alarm_body,
        ))
        .unwrap();

    let arena = NodeArena::new();
    let rete = Rete::new(&arena);
    rules.install_all(&rete);

    let sensor = sensor_type();
    let reading = reading_type();
    for s in 0..sensors {
        rete.assert(sensor.make(vec![Value::from(format!("s{}", s))]));
    }
    for r in 0..readings {
        let id = format!("s{}", r % sensors);
        rete.assert(reading.make(vec![Value::from(id), Value::from(r as i64)]));
    }
    rete.buffer_for("Alarm").unwrap().count()
}

fn bind_chain(n: usize) -> Bindings {
    let scope = Scope::new();
    let mut b = Bindings::new();
    for i in 0..n {
        let v = scope.lookup(&format!("v{}", i));
        b = b.bind(&v, i as i64).unwrap();
    }
    b
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("assert 8x64", |b| {
        b.iter(|| black_box(assert_readings(8, 64)))
    });
    c.bench_function("bind 64", |b| b.iter(|| black_box(bind_chain(64))));
    c.bench_function("get after bind 64", |b| {
        let bindings = bind_chain(64);
        let scope = Scope::new();
        let missing = scope.lookup("missing");
        b.iter(|| black_box(bindings.get(&missing)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
