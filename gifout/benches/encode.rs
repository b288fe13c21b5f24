use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gifout::{ImageDescriptor, OpenMode, SampleFormat, Session};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 64;

/// Make a gradient frame
fn gradient(frame: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((WIDTH * HEIGHT * 4) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            data.push((x * 4) as u8);
            data.push((y * 4) as u8);
            data.push((frame * 32) as u8);
            data.push(255);
        }
    }
    data
}

fn encode_frames(crit: &mut Criterion, name: &str, dither: bool) {
    let frames: Vec<Vec<u8>> = (0..4).map(gradient).collect();
    let desc =
        ImageDescriptor::new(WIDTH, HEIGHT, 4).with_frames_per_second(10.0);
    let descs = vec![desc.clone(); frames.len()];
    crit.bench_function(name, |b| {
        b.iter(|| {
            let mut session = Session::new()
                .with_dither(dither)
                .with_writer(black_box(Vec::with_capacity(32768)));
            session.open("bench.gif", &descs).unwrap();
            for (i, frame) in frames.iter().enumerate() {
                if i > 0 {
                    session
                        .open_with_mode(
                            "bench.gif",
                            &desc,
                            OpenMode::AppendSubimage,
                        )
                        .unwrap();
                }
                session
                    .write_image(SampleFormat::U8, black_box(frame), None, None)
                    .unwrap();
            }
            session.close().unwrap();
        })
    });
}

fn encode_dithered(crit: &mut Criterion) {
    encode_frames(crit, "encode_dithered", true);
}

fn encode_plain(crit: &mut Criterion) {
    encode_frames(crit, "encode_plain", false);
}

criterion_group!(benches, encode_dithered, encode_plain);
criterion_main!(benches);
