use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};
use log::{error, info, LevelFilter};
use std::path::{Path, PathBuf};
use std::process;

use smallvol::util::parse_triple;
use smallvol::{ReaderOptions, SliceViewer, ViewError, ViewerOptions};

fn main() {
    let matches = ClapCommand::new("smallvol")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read a 3D dataset and render its slices")
        .arg(
            Arg::new("path")
                .help("Path to HDF5, N5, zarr, npy, npz, JSON or image file containing a 3D dataset")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("internal_path")
                .short('i')
                .long("internal_path")
                .visible_alias("internal-path")
                .help(
                    "Internal path of dataset inside HDF5, N5, zarr or npz file. \
                     If JSON, the outer value is an object and this is the key of the array",
                )
                .value_name("PATH"),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .long("type")
                .help("Dataset file type. Inferred from extension if not given")
                .value_name("TYPE"),
        )
        .arg(
            Arg::new("order")
                .short('o')
                .long("order")
                .help(
                    "Order of non-channel axes for axis labelling (data is not transposed): \
                     dimension 0 is scrolled through, dimension 1 is vertical, dimension 2 is \
                     horizontal, and dimension 3, if any, holds colour channels",
                )
                .value_name("ORDER")
                .default_value("zyx"),
        )
        .arg(
            Arg::new("offset")
                .short('f')
                .long("offset")
                .help("3D offset of ROI from (0, 0, 0) in pixels, as <scroll>,<vertical>,<horizontal>")
                .value_name("Z,Y,X")
                .value_parser(parse_triple),
        )
        .arg(
            Arg::new("shape")
                .short('s')
                .long("shape")
                .help("3D shape of ROI in pixels, as <scroll>,<vertical>,<horizontal>")
                .value_name("Z,Y,X")
                .value_parser(parse_triple),
        )
        .arg(
            Arg::new("slice")
                .long("slice")
                .help("Index of the slice to render")
                .value_name("INDEX")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .help("Render the slice to this image file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase logging verbosity")
                .action(ArgAction::Count),
        )
        .get_matches();

    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut reader = ReaderOptions::new();
    reader.offset_shape(
        matches.get_one::<[usize; 3]>("offset").copied(),
        matches.get_one::<[usize; 3]>("shape").copied(),
    );
    if let Some(internal_path) = matches.get_one::<String>("internal_path") {
        reader.internal_path(internal_path.as_str());
    }
    if let Some(tag) = matches.get_one::<String>("type") {
        reader.format(tag.as_str());
    }
    let options = ViewerOptions {
        data_order: matches
            .get_one::<String>("order")
            .cloned()
            .unwrap_or_else(|| "zyx".to_string()),
        ..ViewerOptions::default()
    };

    let path = match matches.get_one::<PathBuf>("path") {
        Some(path) => path,
        None => {
            eprintln!("Error: no input path");
            process::exit(2);
        }
    };
    let slice = matches.get_one::<usize>("slice").copied().unwrap_or(0);
    let output = matches.get_one::<PathBuf>("output").map(PathBuf::as_path);

    if let Err(e) = run(path, &reader, options, slice, output) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(
    path: &Path,
    reader: &ReaderOptions,
    options: ViewerOptions,
    slice: usize,
    output: Option<&Path>,
) -> Result<(), ViewError> {
    let mut viewer = SliceViewer::from_file(path, reader, options)?;
    let volume = viewer.volume();
    println!("path:  {}", path.display());
    println!("type:  {}", reader.resolve_format(path));
    println!("shape: {:?}", volume.shape());
    println!("dtype: {}", volume.data_type());
    if let Some((lo, hi)) = volume.value_range() {
        println!("range: {} to {}", lo, hi);
    }

    viewer.set_index(slice)?;
    let (ylabel, xlabel) = viewer.axis_labels();
    println!("slice: {} ({} by {})", viewer.title(), ylabel, xlabel);

    if let Some(output) = output {
        let image = viewer.render()?;
        image
            .save(output)
            .map_err(|e| ViewError::Read(e.into()))?;
        info!("Wrote {}", output.display());
    }
    Ok(())
}
