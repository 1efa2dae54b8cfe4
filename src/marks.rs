use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkingMode {
    NewSeed,
    LocateSuperpixel,
}

impl MarkingMode {
    pub fn to_str(&self) -> &str {
        match self {
            MarkingMode::NewSeed => "New Seed",
            MarkingMode::LocateSuperpixel => "Locate Superpixel",
        }
    }
}

/// Image pixel coordinate, (x, y)
pub type Point = (i32, i32);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Marks {
    /// in click order, duplicates kept
    pub seeds: Vec<Point>,
    /// only the most recent click is kept
    pub superpixel: Option<Point>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Annotation {
    Dot(Point),
    Cross(Point),
}

impl Marks {
    /// Does nothing if no mode has been selected yet.
    pub fn click(&mut self, mode: Option<MarkingMode>, pos: Point) {
        match mode {
            Some(MarkingMode::NewSeed) => {
                trace!("New seed at ({}, {})", pos.0, pos.1);
                self.seeds.push(pos);
            }
            Some(MarkingMode::LocateSuperpixel) => {
                trace!("Superpixel at ({}, {})", pos.0, pos.1);
                self.superpixel = Some(pos);
            }
            None => {
                trace!("Click at ({}, {}) with no marking mode", pos.0, pos.1);
            }
        }
    }

    pub fn erase(&mut self) {
        debug!(
            "Erasing {} seeds, superpixel = {:?}",
            self.seeds.len(),
            self.superpixel
        );
        self.seeds.clear();
        self.superpixel = None;
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty() && self.superpixel.is_none()
    }

    /// Everything that should currently be drawn over the image.
    pub fn annotations(&self) -> Vec<Annotation> {
        let mut out: Vec<Annotation> = self.seeds.iter().map(|&p| Annotation::Dot(p)).collect();
        if let Some(p) = self.superpixel {
            out.push(Annotation::Cross(p));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_append_in_order() {
        let mut marks = Marks::default();
        marks.click(Some(MarkingMode::NewSeed), (10, 20));
        marks.click(Some(MarkingMode::NewSeed), (30, 40));
        marks.click(Some(MarkingMode::NewSeed), (10, 20));
        assert_eq!(marks.seeds, vec![(10, 20), (30, 40), (10, 20)]);
        assert_eq!(marks.superpixel, None);
    }

    #[test]
    fn test_superpixel_keeps_last_click() {
        let mut marks = Marks::default();
        marks.click(Some(MarkingMode::LocateSuperpixel), (1, 2));
        marks.click(Some(MarkingMode::LocateSuperpixel), (3, 4));
        assert_eq!(marks.superpixel, Some((3, 4)));
        assert!(marks.seeds.is_empty());

        let crosses = marks
            .annotations()
            .into_iter()
            .filter(|a| matches!(a, Annotation::Cross(_)))
            .collect::<Vec<_>>();
        assert_eq!(crosses, vec![Annotation::Cross((3, 4))]);
    }

    #[test]
    fn test_click_without_mode_is_ignored() {
        let mut marks = Marks::default();
        marks.click(None, (5, 5));
        assert!(marks.is_empty());
    }

    #[test]
    fn test_modes_are_independent() {
        let mut marks = Marks::default();
        marks.click(Some(MarkingMode::NewSeed), (1, 1));
        marks.click(Some(MarkingMode::LocateSuperpixel), (2, 2));
        marks.click(Some(MarkingMode::NewSeed), (3, 3));
        assert_eq!(marks.seeds, vec![(1, 1), (3, 3)]);
        assert_eq!(marks.superpixel, Some((2, 2)));
        assert_eq!(
            marks.annotations(),
            vec![
                Annotation::Dot((1, 1)),
                Annotation::Dot((3, 3)),
                Annotation::Cross((2, 2)),
            ]
        );
    }

    #[test]
    fn test_erase_clears_everything() {
        let mut marks = Marks::default();
        marks.click(Some(MarkingMode::NewSeed), (1, 1));
        marks.click(Some(MarkingMode::LocateSuperpixel), (2, 2));
        marks.erase();
        assert!(marks.is_empty());
        assert!(marks.annotations().is_empty());
    }
}
