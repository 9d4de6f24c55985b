//! 实验结果.

use crate::profile::Profile;
use ndarray::Array2;
use std::io::{self, Write};
use std::path::Path;

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.3}"),
            None => "/".to_string(),
        }
    }

    let stats = p.get_stats();
    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Phantoms: {}", p.get_phantoms())?;
    writeln!(w, "{S4}Domain cells: {}", p.get_cells())?;
    writeln!(w, "{S4}Propagation time: {} us", p.get_compute_time_us())?;
    writeln!(
        w,
        "{S4}Average cost: {} ns per cell",
        f64_to_display(p.get_ns_per_cell())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    writeln!(w, "{S4}Raster rounds: {}", stats.raster_rounds)?;
    writeln!(
        w,
        "{S4}Queue: {} queued, {} popped, {} stale, {} corrections",
        stats.queued, stats.popped, stats.stale, stats.corrections
    )?;
    writeln!(w, "{S4}Unreachable domain cells: {}", p.get_unreachable())?;
    writeln!(w, "{S4}Cells differing from `hybrid`: {}", p.get_mismatched())?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as f64);
    write!(w, "{S4}Most time-consuming phantom costs {} us", f64_to_display(t))?;
    Ok(())
}

/// 把距离图映射为灰度预览: 不可达为黑色, 其余按最大距离线性拉伸.
fn preview(map: &Array2<f32>) -> image::GrayImage {
    let max = map
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(0.0f32, f32::max);
    let (height, width) = map.dim();
    let mut buf = image::GrayImage::new(width as u32, height as u32);
    for ((h, w), &d) in map.indexed_iter() {
        let gray = match d {
            d if d.is_nan() => 0,
            _ if max == 0.0 => 255,
            d => 32 + (223.0 * d / max).round() as u8,
        };
        buf.put_pixel(w as u32, h as u32, image::Luma([gray]));
    }
    buf
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(&'static str, Profile)>,
    /// `(策略, 幻影, 距离图)`.
    maps: Vec<(&'static str, &'static str, Array2<f32>)>,
}

impl AblationResult {
    pub fn new(
        data: Vec<(&'static str, Profile)>,
        maps: Vec<(&'static str, &'static str, Array2<f32>)>,
    ) -> Self {
        Self { data, maps }
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);

        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut buf).unwrap();
            println!("{}", String::from_utf8_lossy(&buf));
            buf.clear();

            utils::sep();
        }
    }

    /// 将每张距离图保存为 `{策略}-{幻影}.npy` 与 `{策略}-{幻影}.png`. 返回写入的文件数.
    pub fn dump(&self, dir: &Path) -> Result<usize, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(dir)?;
        let mut written = 0;
        for (strategy, phantom, map) in self.maps.iter() {
            let stem = format!("{strategy}-{phantom}");
            ndarray_npy::write_npy(dir.join(format!("{stem}.npy")), map)?;
            preview(map).save(dir.join(format!("{stem}.png")))?;
            written += 2;
        }
        Ok(written)
    }
}
