pub mod drop_area;
pub mod file_list;
pub mod preview;
pub mod status_bar;

#[cfg(test)]
pub(crate) fn row_text(buf: &ratatui::buffer::Buffer, y: u16) -> String {
    (buf.area.x..buf.area.x + buf.area.width)
        .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
        .collect()
}
