#[macro_use]
extern crate error_chain;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use tracing::info;
use tracing_subscriber::EnvFilter;

use hyperart::design::DesignSpec;
use hyperart::errors::*;
use hyperart::Tessellation;

fn usage(prog: &str) -> ! {
    eprintln!("usage: {:} DESIGNFILE [LAYERS] [--points]", prog);
    std::process::exit(1);
}

fn print_layers(t: &dyn Tessellation, show_points: bool) -> Result<()> {

    let d = t.diagram();

    for (i, layer) in d.layers().iter().enumerate() {

        let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();

        for e in layer.elements() {
            *histogram.entry(e.cid()).or_insert(0) += 1;
        }

        let colors: Vec<String> = histogram.iter()
            .map(|(cid, n)| match d.color(*cid) {
                Some(c) => format!("{:}(#{:02x}{:02x}{:02x}):{:}", cid, c.0, c.1, c.2, n),
                None => format!("{:}:{:}", cid, n)
            })
            .collect();

        println!("layer {:}: {:} elements, colors {:}", i, layer.len(), colors.join(" "));

        if show_points {

            for e in d.layer_elements_sorted(i) {

                let pts: Vec<String> = e.poincare_points()?.iter()
                    .map(|(x, y)| format!("({:.6}, {:.6})", x, y))
                    .collect();

                println!("  {:?} z={:} cid={:} {:?}{:} {:}",
                         e.kind(), e.zorder(), e.cid(), e.line_style(),
                         if e.filled() { " filled" } else { "" },
                         pts.join(" "));

            }

        }

    }

    Ok(())

}

fn run() -> Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
                         .unwrap_or_else(|_| EnvFilter::new("hyperart=info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let show_points = args.iter().skip(1).any(|a| a == "--points");
    let positional: Vec<&String> = args.iter().skip(1).filter(|a| *a != "--points").collect();

    if positional.is_empty() || positional.len() > 2 {
        usage(&args[0]);
    }

    let filename = positional[0];

    let f = File::open(filename).chain_err(|| format!("opening {:}", filename))?;
    let mut reader = BufReader::new(f);

    let ds = DesignSpec::parse(filename, &mut reader)?;

    let mut t = ds.build()?;

    if positional.len() == 2 {
        let layers = match positional[1].parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => usage(&args[0])
        };
        t.diagram_mut().set_num_layers(layers);
    }

    t.init().chain_err(|| format!("{:}: init failed", filename))?;
    t.make().chain_err(|| format!("{:}: make failed", filename))?;

    info!("{:}: {:?}, {:} layers, {:} elements",
          filename, t.kind(), t.layers().len(), t.diagram().total_elements());

    print_layers(t.as_ref(), show_points)

}

quick_main!(run);
