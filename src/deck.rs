//! A deck of cards.

use std::iter::FromIterator;

use rand::distributions::{Distribution, Standard};
use rand::seq::SliceRandom;

/// An ordered deck of cards. Cards are dealt from the back.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck<C> {
    cards: Vec<C>,
}

impl<C> Distribution<Deck<C>> for Standard
where
    Deck<C>: Default,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Deck<C> {
        let mut deck = Deck::default();
        deck.cards.shuffle(rng);
        deck
    }
}

impl<C> FromIterator<C> for Deck<C> {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        let cards = iter.into_iter().collect();
        Self { cards }
    }
}

impl<C> Deck<C> {
    /// The number of cards remaining in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffles the remaining cards.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Removes up to `n` cards from the back of the deck.
    pub fn take(&mut self, n: usize) -> Vec<C> {
        let idx = self.cards.len().saturating_sub(n);
        self.cards.split_off(idx)
    }

    /// Removes a single card from the back of the deck.
    pub fn take_one(&mut self) -> Option<C> {
        self.cards.pop()
    }

    /// Removes all remaining cards, in deck order.
    pub fn take_all(&mut self) -> Vec<C> {
        std::mem::take(&mut self.cards)
    }
}
