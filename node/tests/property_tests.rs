//! Property-based coverage of balance conservation and admission
//! idempotence over randomly generated reward chains and amounts.

use ledger_common::block::Block;
use ledger_common::crypto::{Hashable, PrivateKey, PublicKey};
use ledger_common::transaction::Transaction;
use ledger_node::core::{BlockChain, TransactionPool};
use proptest::prelude::*;

const DIFFICULTY: u32 = 4;

fn mine(index: u64, prev: Option<ledger_common::crypto::Hash>, addr: &PublicKey, amount: u64) -> Block {
    let mut nonce = 0u64;
    loop {
        let reward = Transaction::new_reward(*addr, amount, index);
        let block = Block::new(index, index, vec![reward], nonce, prev, DIFFICULTY);
        if block.hash.has_leading_zero_hex_chars(DIFFICULTY) {
            return block;
        }
        nonce += 1;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Property: after appending a chain of reward-only blocks to random
    // recipients, the sum of every recipient's balance equals the sum of
    // the reward amounts minted.
    #[test]
    fn balance_conservation_over_reward_chain(amounts in prop::collection::vec(1u64..1000, 1..6)) {
        let (sender, _rx) = ledger_node::task_queue::channel();
        let chain = BlockChain::new(sender.clone());
        let pool = TransactionPool::new(sender);

        let recipients: Vec<PublicKey> = amounts.iter().map(|_| PrivateKey::generate().public_key()).collect();

        let mut prev_hash = None;
        let mut index = 1u64;
        for (recipient, amount) in recipients.iter().zip(&amounts) {
            let block = mine(index, prev_hash, recipient, *amount);
            prev_hash = Some(block.hash);
            let result = chain.append(block, &pool);
            prop_assert!(result.success);
            index += 1;
        }

        let total_balance: i64 = recipients.iter().map(|addr| chain.balance(addr)).sum();
        let total_minted: i64 = amounts.iter().map(|a| *a as i64).sum();
        prop_assert_eq!(total_balance, total_minted);
    }

    // Property: admitting the same reward transaction twice always yields
    // success then TX_REPEAT, independent of the amount chosen.
    #[test]
    fn duplicate_admission_is_rejected_regardless_of_amount(amount in 1u64..10_000) {
        let (sender, _rx) = ledger_node::task_queue::channel();
        let chain = BlockChain::new(sender.clone());
        let pool = TransactionPool::new(sender);

        let recipient = PrivateKey::generate().public_key();
        let mut tx = Transaction::new_reward(recipient, amount, 0);
        tx.is_from_peer = true;

        let first = pool.add(tx.clone(), &chain);
        let second = pool.add(tx, &chain);
        prop_assert!(first.success);
        prop_assert!(!second.success);
        prop_assert_eq!(second.error_code, Some(10));
        prop_assert_eq!(pool.len(), 1);
    }
}
