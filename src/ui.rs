pub mod arithmetic_screen;
pub mod history;
pub mod typing_screen;

pub(crate) const HORIZONTAL_MARGIN: u16 = 5;
pub(crate) const VERTICAL_MARGIN: u16 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_fit_a_common_terminal() {
        const _: () = assert!(HORIZONTAL_MARGIN * 2 < 80);
        const _: () = assert!(VERTICAL_MARGIN * 2 < 24);
    }
}
