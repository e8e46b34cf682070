use chrono::NaiveDate;
use fake::faker::lorem::en::{Sentence, Words};
use fake::{Fake, Faker};
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use suagrana_repo::transaction_repo::{Entry, NewTransaction, TransactionKind};

pub trait Generator<T> {
    fn gen(&mut self) -> T;
}

pub struct Predefined<T> {
    values: Vec<T>,
    current_pos: usize,
}

impl<T> Predefined<T> {
    pub fn boxed(values: Vec<T>) -> Box<Predefined<T>> {
        Box::new(Predefined {
            values,
            current_pos: 0,
        })
    }
}

impl<T: Clone> Generator<T> for Predefined<T> {
    fn gen(&mut self) -> T {
        let v = self.values[self.current_pos].clone();
        self.current_pos += 1;
        v
    }
}

pub struct RandomSample<T> {
    values: Vec<T>,
}

impl<T> RandomSample<T> {
    pub fn boxed(values: Vec<T>) -> Box<RandomSample<T>> {
        Box::new(RandomSample { values })
    }
}

impl<T: Clone> Generator<T> for RandomSample<T> {
    fn gen(&mut self) -> T {
        self.values.choose(&mut rand::thread_rng()).unwrap().clone()
    }
}

pub struct FakeGenerator<F: Fake> {
    fake: F,
}

impl<F: Fake> FakeGenerator<F> {
    pub fn boxed(fake: F) -> Box<FakeGenerator<F>> {
        Box::new(FakeGenerator { fake })
    }
}

impl<T: fake::Dummy<F>, F> Generator<T> for FakeGenerator<F> {
    fn gen(&mut self) -> T {
        self.fake.fake()
    }
}

/// Strictly positive amounts with two decimal places.
pub struct FakeAmount;

impl Generator<Decimal> for FakeAmount {
    fn gen(&mut self) -> Decimal {
        let cents = Faker.fake::<u16>() as i64 + 1;
        Decimal::new(cents, 2)
    }
}

struct FakeDescription;

impl Generator<String> for FakeDescription {
    fn gen(&mut self) -> String {
        let words: Vec<String> = Words(1..4).fake();
        words.join(" ")
    }
}

/// Builds single-entry income or expense transactions against one account.
#[allow(dead_code)]
pub struct NewTransactionGenerator {
    kind: TransactionKind,
    account_id: i32,
    cat_gen: Box<dyn Generator<Option<i32>>>,
    desc_gen: Box<dyn Generator<String>>,
    note_gen: Box<dyn Generator<Option<String>>>,
    date_gen: Box<dyn Generator<NaiveDate>>,
    amnt_gen: Box<dyn Generator<Decimal>>,
}

#[allow(dead_code)]
impl NewTransactionGenerator {
    pub fn expenses(account_id: i32) -> NewTransactionGenerator {
        NewTransactionGenerator::new(TransactionKind::Expense, account_id)
    }

    pub fn incomes(account_id: i32) -> NewTransactionGenerator {
        NewTransactionGenerator::new(TransactionKind::Income, account_id)
    }

    fn new(kind: TransactionKind, account_id: i32) -> NewTransactionGenerator {
        NewTransactionGenerator {
            kind,
            account_id,
            cat_gen: RandomSample::boxed(vec![None]),
            desc_gen: Box::new(FakeDescription),
            note_gen: FakeGenerator::boxed(Sentence(3..8)),
            date_gen: FakeGenerator::boxed(Faker),
            amnt_gen: Box::new(FakeAmount),
        }
    }

    pub fn with_categories(mut self, categories: Vec<i32>) -> NewTransactionGenerator {
        self.cat_gen = RandomSample::boxed(categories.into_iter().map(Some).collect());
        self
    }

    pub fn with_dates(mut self, dates: Vec<NaiveDate>) -> NewTransactionGenerator {
        self.date_gen = Predefined::boxed(dates);
        self
    }

    pub fn with_amounts(mut self, amounts: Vec<Decimal>) -> NewTransactionGenerator {
        self.amnt_gen = Predefined::boxed(amounts);
        self
    }

    pub fn generate(&mut self) -> NewTransaction {
        let category_id = self.cat_gen.gen();
        let amount = self.amnt_gen.gen();
        let entry = match self.kind {
            TransactionKind::Income => Entry::debit(self.account_id, category_id, amount),
            _ => Entry::credit(self.account_id, category_id, amount),
        };
        NewTransaction::new(
            self.desc_gen.gen(),
            self.date_gen.gen(),
            self.kind,
            self.note_gen.gen(),
            vec![entry],
        )
    }

    pub fn generate_many(&mut self, count: usize) -> Vec<NewTransaction> {
        let mut vec = Vec::with_capacity(count);
        for _ in 0..count {
            vec.push(self.generate())
        }
        vec
    }
}
