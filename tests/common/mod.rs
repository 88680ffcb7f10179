#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mandelbrot_pdf::Config;

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()
}

pub fn render(config: &Config) -> String {
    let bytes = mandelbrot_pdf::render_pdf(config, fixed_time()).expect("render");
    String::from_utf8(bytes).expect("output is ASCII")
}

pub struct XrefRow {
    pub offset: usize,
    pub generation: u32,
    pub flag: char,
}

/// Value written after the `startxref` keyword.
pub fn startxref(pdf: &str) -> usize {
    let tail = pdf.rsplit("startxref").next().unwrap();
    tail.split_whitespace().next().unwrap().parse().unwrap()
}

/// Rows of the xref section that `startxref` points at.
pub fn xref_rows(pdf: &str) -> Vec<XrefRow> {
    let section = &pdf[startxref(pdf)..];
    let mut lines = section
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|l| !l.is_empty());
    assert_eq!(lines.next(), Some("xref"));
    let header = lines.next().unwrap();
    let count: usize = header.split_whitespace().nth(1).unwrap().parse().unwrap();
    lines
        .take(count)
        .map(|l| {
            let parts: Vec<&str> = l.split_whitespace().collect();
            XrefRow {
                offset: parts[0].parse().unwrap(),
                generation: parts[1].parse().unwrap(),
                flag: parts[2].chars().next().unwrap(),
            }
        })
        .collect()
}

/// Text from `id 0 obj` up to and including its `endobj`.
pub fn object_text(pdf: &str, id: usize) -> &str {
    let rows = xref_rows(pdf);
    let start = rows[id].offset;
    let end = start + pdf[start..].find("endobj").unwrap() + "endobj".len();
    &pdf[start..end]
}

/// Declared `/Length` and the raw bytes of an object's stream.
pub fn stream_data(pdf: &str, id: usize) -> (usize, &str) {
    let obj = object_text(pdf, id);
    let length: usize = obj
        .split("/Length")
        .nth(1)
        .unwrap()
        .split_whitespace()
        .next()
        .unwrap()
        .parse()
        .unwrap();
    let keyword = obj.find("\nstream").or_else(|| obj.find("\rstream")).unwrap() + 1;
    let mut data_start = keyword + "stream".len();
    // Skip the EOL after the keyword.
    if obj[data_start..].starts_with("\r\n") {
        data_start += 2;
    } else {
        data_start += 1;
    }
    let data_end = obj.find("endstream").unwrap();
    (length, &obj[data_start..data_end])
}

// A small interpreter for the calculator subset the generator emits.

#[derive(Clone, Debug)]
pub enum Item {
    Num(f64),
    Op(String),
    Proc(Vec<Item>),
}

#[derive(Clone, Debug)]
enum Value {
    Num(f64),
    Bool(bool),
    Proc(Vec<Item>),
}

pub fn parse_program(src: &str) -> Vec<Item> {
    let mut tokens = src.split_whitespace();
    assert_eq!(tokens.next(), Some("{"), "program must start with a brace");
    let body = parse_block(&mut tokens);
    assert!(tokens.next().is_none(), "trailing tokens after program");
    body
}

fn parse_block<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Vec<Item> {
    let mut items = Vec::new();
    loop {
        match tokens.next().expect("unbalanced braces") {
            "}" => return items,
            "{" => items.push(Item::Proc(parse_block(tokens))),
            t => match t.parse::<f64>() {
                Ok(n) => items.push(Item::Num(n)),
                Err(_) => items.push(Item::Op(t.to_string())),
            },
        }
    }
}

fn pop_num(stack: &mut Vec<Value>) -> f64 {
    match stack.pop() {
        Some(Value::Num(n)) => n,
        other => panic!("expected number, got {other:?}"),
    }
}

fn run(items: &[Item], stack: &mut Vec<Value>) {
    for item in items {
        match item {
            Item::Num(n) => stack.push(Value::Num(*n)),
            Item::Proc(p) => stack.push(Value::Proc(p.clone())),
            Item::Op(op) => match op.as_str() {
                "add" | "sub" | "mul" | "div" => {
                    let b = pop_num(stack);
                    let a = pop_num(stack);
                    stack.push(Value::Num(match op.as_str() {
                        "add" => a + b,
                        "sub" => a - b,
                        "mul" => a * b,
                        _ => a / b,
                    }));
                }
                "ge" => {
                    let b = pop_num(stack);
                    let a = pop_num(stack);
                    stack.push(Value::Bool(a >= b));
                }
                "exch" => {
                    let n = stack.len();
                    stack.swap(n - 1, n - 2);
                }
                "dup" => {
                    let top = stack.last().unwrap().clone();
                    stack.push(top);
                }
                "pop" => {
                    stack.pop().unwrap();
                }
                "copy" => {
                    let n = pop_num(stack) as usize;
                    let len = stack.len();
                    let copied: Vec<Value> = stack[len - n..].to_vec();
                    stack.extend(copied);
                }
                "index" => {
                    let n = pop_num(stack) as usize;
                    let v = stack[stack.len() - 1 - n].clone();
                    stack.push(v);
                }
                "roll" => {
                    let j = pop_num(stack) as i64;
                    let n = pop_num(stack) as usize;
                    let len = stack.len();
                    let shift = j.rem_euclid(n as i64) as usize;
                    stack[len - n..].rotate_right(shift);
                }
                "ifelse" => {
                    let (Some(Value::Proc(else_)), Some(Value::Proc(then)), Some(Value::Bool(cond))) =
                        (stack.pop(), stack.pop(), stack.pop())
                    else {
                        panic!("ifelse needs bool proc proc");
                    };
                    run(if cond { &then } else { &else_ }, stack);
                }
                other => panic!("unsupported operator {other}"),
            },
        }
    }
}

/// Runs a function body on inputs `(x, y)` and returns the remaining stack.
pub fn evaluate(program: &[Item], x: f64, y: f64) -> Vec<f64> {
    let mut stack = vec![Value::Num(x), Value::Num(y)];
    run(program, &mut stack);
    stack
        .into_iter()
        .map(|v| match v {
            Value::Num(n) => n,
            other => panic!("non-numeric result {other:?}"),
        })
        .collect()
}
