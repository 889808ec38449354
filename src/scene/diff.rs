use std::collections::{BTreeMap, BTreeSet};

/// Result of comparing the keys on screen with the keys that should be on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyDiff<K> {
    /// In the order of the new key list.
    pub entering: Vec<K>,
    /// In the order of the new key list.
    pub persisting: Vec<K>,
    /// In the order of the current key list.
    pub exiting: Vec<K>,
}

impl<K> KeyDiff<K> {
    /// True when nothing enters or exits.
    pub fn is_unchanged(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

pub fn diff<K: Ord + Clone>(current: &[K], next: &[K]) -> KeyDiff<K> {
    let current_set = current.iter().collect::<BTreeSet<_>>();
    let next_set = next.iter().collect::<BTreeSet<_>>();

    let mut result = KeyDiff {
        entering: Vec::new(),
        persisting: Vec::new(),
        exiting: Vec::new(),
    };
    let mut seen = BTreeSet::new();
    for key in next {
        if !seen.insert(key) {
            continue;
        }
        if current_set.contains(key) {
            result.persisting.push(key.clone());
        } else {
            result.entering.push(key.clone());
        }
    }
    seen.clear();
    for key in current {
        if seen.insert(key) && !next_set.contains(key) {
            result.exiting.push(key.clone());
        }
    }
    result
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FadeDirection {
    In,
    Steady,
    Out,
}

#[derive(Clone, Copy, Debug)]
struct Fade {
    opacity: f32,
    direction: FadeDirection,
}

/// Keyed collection of rendered elements with enter/exit fades.
///
/// Entering keys fade in from zero, exiting keys fade out and are dropped once invisible,
/// persisting keys keep their state. A key that comes back while fading out fades in again
/// from its current opacity.
#[derive(Clone, Debug)]
pub struct FadeSet<K: Ord> {
    entries: BTreeMap<K, Fade>,
    duration: f32,
}

impl<K: Ord + Clone> FadeSet<K> {
    pub fn new(duration_seconds: f32) -> Self {
        Self {
            entries: BTreeMap::new(),
            duration: duration_seconds.max(f32::EPSILON),
        }
    }

    /// Keys that are present and not on their way out.
    pub fn present_keys(&self) -> Vec<K> {
        self.entries
            .iter()
            .filter(|(_, fade)| fade.direction != FadeDirection::Out)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn apply(&mut self, next: &[K]) -> KeyDiff<K> {
        let result = diff(&self.present_keys(), next);

        for key in &result.entering {
            let opacity = self.entries.get(key).map(|fade| fade.opacity).unwrap_or(0.0);
            self.entries.insert(
                key.clone(),
                Fade {
                    opacity,
                    direction: FadeDirection::In,
                },
            );
        }
        for key in &result.exiting {
            if let Some(fade) = self.entries.get_mut(key) {
                fade.direction = FadeDirection::Out;
            }
        }
        result
    }

    /// Moves every running fade forward; returns whether any fade is still running.
    pub fn advance(&mut self, dt_seconds: f32) -> bool {
        let step = dt_seconds.max(0.0) / self.duration;
        self.entries.retain(|_, fade| match fade.direction {
            FadeDirection::In => {
                fade.opacity = (fade.opacity + step).min(1.0);
                if fade.opacity >= 1.0 {
                    fade.direction = FadeDirection::Steady;
                }
                true
            }
            FadeDirection::Out => {
                fade.opacity = (fade.opacity - step).max(0.0);
                fade.opacity > 0.0
            }
            FadeDirection::Steady => true,
        });
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.entries
            .values()
            .any(|fade| fade.direction != FadeDirection::Steady)
    }

    /// Current opacity, `None` once a key has fully faded out.
    pub fn opacity(&self, key: &K) -> Option<f32> {
        self.entries.get(key).map(|fade| fade.opacity)
    }

    /// Every drawn key with its opacity, exiting ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f32)> {
        self.entries.iter().map(|(key, fade)| (key, fade.opacity))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{FadeSet, diff};

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[test]
    fn diff_splits_keys_by_membership() {
        let result = diff(&keys(&["vae", "gan", "flow"]), &keys(&["ddpm", "gan", "vae"]));

        assert_eq!(result.entering, keys(&["ddpm"]));
        assert_eq!(result.persisting, keys(&["gan", "vae"]));
        assert_eq!(result.exiting, keys(&["flow"]));
        assert!(!result.is_unchanged());
    }

    #[test]
    fn applying_the_same_keys_twice_changes_nothing() {
        let mut fades = FadeSet::<String>::new(0.3);
        let first = fades.apply(&keys(&["vae", "gan"]));
        assert_eq!(first.entering.len(), 2);

        fades.advance(0.1);
        let opacity = fades.opacity(&"vae".to_owned());

        let second = fades.apply(&keys(&["vae", "gan"]));
        assert!(second.is_unchanged());
        assert_eq!(second.persisting.len(), 2);
        assert_eq!(fades.opacity(&"vae".to_owned()), opacity);
    }

    #[test]
    fn fades_run_to_completion() {
        let mut fades = FadeSet::<String>::new(0.3);
        fades.apply(&keys(&["vae", "gan"]));
        assert_eq!(fades.opacity(&"gan".to_owned()), Some(0.0));

        assert!(!fades.advance(0.4));
        assert_eq!(fades.opacity(&"gan".to_owned()), Some(1.0));

        let result = fades.apply(&keys(&["vae"]));
        assert_eq!(result.exiting, keys(&["gan"]));
        assert_eq!(fades.len(), 2);
        assert_eq!(fades.present_keys(), keys(&["vae"]));

        assert!(fades.advance(0.15));
        let halfway = fades.opacity(&"gan".to_owned()).expect("still fading");
        assert!((halfway - 0.5).abs() < 1e-4);

        assert!(!fades.advance(0.15));
        assert_eq!(fades.opacity(&"gan".to_owned()), None);
        assert_eq!(fades.len(), 1);
    }

    #[test]
    fn returning_key_fades_back_in_from_where_it_was() {
        let mut fades = FadeSet::<String>::new(0.3);
        fades.apply(&keys(&["vae"]));
        fades.advance(1.0);
        fades.apply(&[]);
        fades.advance(0.15);

        let result = fades.apply(&keys(&["vae"]));
        assert_eq!(result.entering, keys(&["vae"]));
        let opacity = fades.opacity(&"vae".to_owned()).expect("kept");
        assert!((opacity - 0.5).abs() < 1e-4);

        fades.advance(0.15);
        assert_eq!(fades.opacity(&"vae".to_owned()), Some(1.0));
        assert!(!fades.is_animating());
    }
}
