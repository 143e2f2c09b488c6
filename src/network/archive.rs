//! Model archive: a zip file holding `meta.json` plus one weight blob and one
//! bias blob per layer (see `math::binary` for the blob layout).

use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::math::{binary, matrix::Matrix};
use crate::network::network::Network;
use crate::network::options::NetworkOptions;

pub const META_ENTRY: &str = "meta.json";

/// Upper bound on the size of `meta.json`.
const META_LIMIT: u64 = 1 << 20;

impl Network {
    /// Writes the network to `path` as a model archive.
    ///
    /// The archive is assembled in a temporary file next to `path` and renamed
    /// over it once complete, so an interrupted save never leaves a partial
    /// archive at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        self.write_archive(tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!("Saved {}-layer network to {}", self.layers.len(), path.display());
        Ok(())
    }

    /// Reads a model archive written by [`Network::save`].
    ///
    /// Fails without returning a partial network if `meta.json` or any blob is
    /// missing or malformed, or if a blob's shape disagrees with the topology.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut zip = ZipArchive::new(BufReader::new(file))?;

        let meta = read_entry(&mut zip, META_ENTRY, META_LIMIT)?;
        let opts: NetworkOptions = serde_json::from_slice(&meta)?;
        let layer_count = opts.layer_count();
        if opts.weight_paths.len() != layer_count || opts.bias_paths.len() != layer_count {
            return Err(NetError::Format(format!(
                "metadata lists {} weight and {} bias blobs for {} layers",
                opts.weight_paths.len(),
                opts.bias_paths.len(),
                layer_count
            )));
        }

        // Shapes only; nothing is allocated from the metadata sizes.
        let shapes = Network::layer_shapes(opts.input_size, opts.output_size, &opts.hidden_sizes)
            .map_err(|e| NetError::Format(e.to_string()))?;

        let mut layers = Vec::with_capacity(layer_count);
        for (i, &(size, input_size)) in shapes.iter().enumerate() {
            let weights = read_blob(&mut zip, &opts.weight_paths[i], (size, input_size))?;
            let biases = read_blob(&mut zip, &opts.bias_paths[i], (size, 1))?;
            layers.push(Layer { weights, biases });
        }

        debug!("Loaded {}-layer network from {}", layer_count, path.display());
        Ok(Network::from_layers(
            opts.input_size,
            opts.output_size,
            opts.hidden_sizes,
            layers,
            opts.learning_rate,
        ))
    }

    fn write_archive<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let entry = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let opts = self.options();

        zip.start_file(META_ENTRY, entry)?;
        zip.write_all(&serde_json::to_vec(&opts)?)?;

        for (i, layer) in self.layers.iter().enumerate() {
            zip.start_file(opts.weight_paths[i].as_str(), entry)?;
            binary::write_matrix(&mut zip, &layer.weights)?;

            zip.start_file(opts.bias_paths[i].as_str(), entry)?;
            binary::write_matrix(&mut zip, &layer.biases)?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// Reads entry `name`, refusing anything larger than `limit` bytes. The
/// declared size is checked first and the read itself is capped, so a
/// lying header cannot inflate the buffer either.
fn read_entry<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str, limit: u64) -> Result<Vec<u8>> {
    let entry = zip.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => NetError::Format(format!("archive has no entry {name}")),
        other => NetError::Archive(other),
    })?;

    if entry.size() > limit {
        return Err(NetError::Format(format!(
            "{name} is {} bytes, at most {limit} expected",
            entry.size()
        )));
    }

    let mut buf = Vec::new();
    entry.take(limit.saturating_add(1)).read_to_end(&mut buf)?;
    if buf.len() as u64 > limit {
        return Err(NetError::Format(format!("{name} is larger than {limit} bytes")));
    }
    Ok(buf)
}

fn read_blob<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    name: &str,
    dims: (usize, usize),
) -> Result<Matrix> {
    let limit = binary::blob_len(dims.0, dims.1)
        .ok_or_else(|| NetError::Format(format!("{name}: {dims:?} matrix is too large")))?;
    let matrix = binary::decode(&read_entry(zip, name, limit as u64)?)?;
    if matrix.dims() != dims {
        return Err(NetError::Format(format!(
            "{name} is {:?}, topology expects {dims:?}",
            matrix.dims()
        )));
    }
    Ok(matrix)
}
